/// A running sum that yields its average on demand.
///
/// Values are accumulated in `f64` to keep long sums stable; the mean is
/// reported as `f32`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    /// Adds one sample.
    pub fn add(&mut self, value: f32) {
        self.sum += f64::from(value);
        self.count += 1;
    }

    /// Returns the number of samples added.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns the sum of all samples.
    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the average of all samples, or `None` if there are none.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn mean(&self) -> Option<f32> {
        (self.count > 0).then(|| (self.sum / f64::from(self.count)) as f32)
    }
}

/// Divides `numerator` by `denominator`, or returns `None` for a zero
/// denominator.
///
/// # Examples
///
/// ```
/// # use census_stats::mean::ratio;
/// assert_eq!(ratio(1, 4), Some(0.25));
/// assert_eq!(ratio(1, 0), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> Option<f32> {
    (denominator > 0).then(|| numerator as f32 / denominator as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mean_is_none() {
        assert_eq!(RunningMean::new().mean(), None);
    }

    #[test]
    fn test_mean() {
        let mut mean = RunningMean::new();
        for value in [1.0, 2.0, 3.0, 4.0] {
            mean.add(value);
        }
        assert_eq!(mean.count(), 4);
        assert_eq!(mean.sum(), 10.0);
        assert_eq!(mean.mean(), Some(2.5));
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(0, 0), None);
        assert_eq!(ratio(0, 3), Some(0.0));
    }
}
