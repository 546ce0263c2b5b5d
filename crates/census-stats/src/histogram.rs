/// Fixed-size bucket counters.
///
/// The bucket count is set at construction and never changes, so the set of
/// valid indices is always `0..len()`. The total is derived from the buckets
/// rather than stored, which keeps `total() == sum(counts)` true by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountHistogram {
    counts: Vec<u32>,
}

impl CountHistogram {
    /// Creates a histogram with `len` buckets, all zero.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            counts: vec![0; len],
        }
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if the histogram has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Adds one to bucket `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    /// Returns the count of bucket `index`, or 0 if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> u32 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Returns all bucket counts in order.
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Returns the sum of all buckets.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Returns `value` as a percentage of `total`.
///
/// A zero total yields `0.0` rather than NaN.
///
/// # Examples
///
/// ```
/// # use census_stats::histogram::percent_of;
/// assert_eq!(percent_of(1, 4), 25.0);
/// assert_eq!(percent_of(3, 0), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn percent_of(value: u32, total: u32) -> f32 {
    if total == 0 {
        return 0.0;
    }
    100.0 * value as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_tracks_increments() {
        let mut histogram = CountHistogram::new(3);
        assert_eq!(histogram.total(), 0);
        for idx in [0, 1, 1, 2, 2, 2] {
            histogram.increment(idx);
        }
        assert_eq!(histogram.counts(), &[1, 2, 3]);
        assert_eq!(histogram.total(), 6);
    }

    #[test]
    fn test_get_out_of_range_is_zero() {
        let histogram = CountHistogram::new(2);
        assert_eq!(histogram.get(5), 0);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_increment_out_of_range_panics() {
        let mut histogram = CountHistogram::new(2);
        histogram.increment(2);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = CountHistogram::new(0);
        assert!(histogram.is_empty());
        assert_eq!(histogram.total(), 0);
    }
}
