/// The minimum and maximum of a metric over a set of samples.
///
/// An empty range is represented with `min > max`. This sentinel means
/// "no sample qualified" and must be checked before normalizing, see
/// [`MetricRange::is_empty`].
///
/// A range where `min == max` is *degenerate*: every sample has the same
/// value and there is nothing to normalize against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    /// The smallest value included so far.
    pub min: f32,
    /// The largest value included so far.
    pub max: f32,
}

impl Default for MetricRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl MetricRange {
    /// A range with no samples (`min > max`).
    pub const EMPTY: Self = Self {
        min: f32::MAX,
        max: f32::MIN,
    };

    /// Builds a range over the given values.
    ///
    /// NaN values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use census_stats::range::MetricRange;
    /// let range = MetricRange::from_values([]);
    /// assert!(range.is_empty());
    ///
    /// let range = MetricRange::from_values([3.0, 1.0]);
    /// assert_eq!((range.min, range.max), (1.0, 3.0));
    /// ```
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        let mut range = Self::EMPTY;
        for value in values {
            range.include(value);
        }
        range
    }

    /// Widens the range to include `value`.
    pub fn include(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.min = f32::min(self.min, value);
        self.max = f32::max(self.max, value);
    }

    /// Returns `true` if no value has been included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns `true` if the range contains exactly one distinct value.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        #[expect(clippy::float_cmp)]
        let same = self.min == self.max;
        same
    }

    /// Returns the position of `value` inside the range, clamped to `[0, 1]`.
    ///
    /// # Returns
    ///
    /// * `None` - if the range is empty or degenerate
    /// * `Some(t)` - the normalized position otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// # use census_stats::range::MetricRange;
    /// let range = MetricRange { min: 10.0, max: 20.0 };
    /// assert_eq!(range.proportion(15.0), Some(0.5));
    /// assert_eq!(range.proportion(25.0), Some(1.0));
    /// assert_eq!(MetricRange { min: 4.0, max: 4.0 }.proportion(4.0), None);
    /// ```
    #[must_use]
    pub fn proportion(&self, value: f32) -> Option<f32> {
        if self.is_empty() || self.is_degenerate() {
            return None;
        }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }
}
