//! Numeric building blocks for the census workspace.
//!
//! This crate provides the small, dependency-free statistics used by the
//! aggregation engine:
//!
//! - **Ranges**: Track the minimum and maximum of a metric, with an explicit
//!   "no data" sentinel and degenerate-range handling
//! - **Count histograms**: Fixed-size bucket counters with a derived total
//! - **Running means**: Sum/count accumulators whose division is guarded
//!
//! # Modules
//!
//! - [`range`]: Min/max tracking and normalization into `[0, 1]`
//! - [`histogram`]: Fixed bucket counters and percentage helpers
//! - [`mean`]: Running sums that produce an average on demand
//!
//! # Examples
//!
//! ## Tracking a range
//!
//! ```
//! use census_stats::range::MetricRange;
//!
//! let range = MetricRange::from_values([30.0, 42.0, 18.0]);
//! assert_eq!(range.min, 18.0);
//! assert_eq!(range.max, 42.0);
//! assert_eq!(range.proportion(30.0), Some(0.5));
//! ```
//!
//! ## Counting into buckets
//!
//! ```
//! use census_stats::histogram::CountHistogram;
//!
//! let mut histogram = CountHistogram::new(4);
//! histogram.increment(0);
//! histogram.increment(2);
//! histogram.increment(2);
//! assert_eq!(histogram.total(), 3);
//! assert_eq!(histogram.get(2), 2);
//! ```
//!
//! ## Averaging
//!
//! ```
//! use census_stats::mean::RunningMean;
//!
//! let mut mean = RunningMean::new();
//! mean.add(10.0);
//! mean.add(50.0);
//! assert_eq!(mean.mean(), Some(30.0));
//! ```

pub mod histogram;
pub mod mean;
pub mod range;
