//! Incremental demographic aggregation for a simulation host.
//!
//! The engine reads the host's citizen, building and household tables through
//! the [`Host`] trait, classifies every resident along twelve demographic
//! [`Axis`] values, accumulates per-building statistics, and publishes the
//! result as an immutable [`Snapshot`] that a presentation layer can read at
//! any time.
//!
//! - [`host`] - Read-only accessor traits and record types
//! - [`classify`] - Axis table and the pure classifier
//! - [`aggregate`] - Building statistics, metric bounds and data-row histograms
//! - [`color`] - Mapping metric values onto a color ramp
//! - [`scan`] - The incremental scanner and the double-buffered snapshot
//! - [`census`] - The simulation-side writer and presentation-side reader
//!
//! # Example
//!
//! ```no_run
//! use census_engine::{Axis, CensusConfig, DistrictFilter, Host, census};
//!
//! fn run<H: Host>(host: &H) {
//!     let (mut writer, reader) = census::channel(CensusConfig::default());
//!
//!     // Simulation thread: once per simulation step
//!     writer.tick(host);
//!
//!     // Presentation thread: whenever a redraw is requested
//!     if reader.take_redraw() {
//!         let rows = reader.data_rows(Axis::AgeGroup, Axis::Education, DistrictFilter::EntireCity);
//!         println!("{} residents", rows.total.total());
//!     }
//! }
//! ```

pub use self::{
    aggregate::*,
    census::{CensusReader, CensusWriter, TickOutcome},
    classify::*,
    color::*,
    config::*,
    host::*,
    scan::*,
};

pub mod aggregate;
pub mod census;
pub mod classify;
pub mod color;
mod config;
pub mod host;
pub mod scan;

#[cfg(test)]
mod testing;

/// A household unit chain that does not terminate within the unit table size.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum UnitChainError {
    #[display("unit chain starting at unit {start} exceeded {limit} links")]
    Cycle { start: UnitId, limit: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown axis '{name}'")]
pub struct ParseAxisError {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown metric '{name}'")]
pub struct ParseMetricError {
    pub name: String,
}
