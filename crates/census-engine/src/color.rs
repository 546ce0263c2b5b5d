//! Mapping building metric values onto a two-color ramp.

use std::fmt;

use census_stats::range::MetricRange;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque 8-bit RGB color.
///
/// Serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation from `self` (at `t = 0`) to `other` (at `t = 1`).
    ///
    /// `t` is clamped to `[0, 1]`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| {
            let a = f32::from(a);
            let b = f32::from(b);
            (a + (b - a) * t).round() as u8
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let hex = text.strip_prefix('#').unwrap_or(&text);
        if hex.len() != 6 {
            return Err(serde::de::Error::custom(format!(
                "invalid color: expected 6 hex digits, got '{text}'"
            )));
        }
        let num = u32::from_str_radix(hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid color: {text} ({e})")))?;
        let [_, r, g, b] = num.to_be_bytes();
        Ok(Self { r, g, b })
    }
}

/// The endpoint and fallback colors used to paint buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRamp {
    /// Color of the building with the smallest metric value.
    pub low: Rgb,
    /// Color of the building with the largest metric value.
    pub high: Rgb,
    /// Color of buildings without data for the selected metric.
    pub neutral: Rgb,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            low: Rgb::new(0x2b, 0x83, 0xba),
            high: Rgb::new(0xd7, 0x19, 0x1c),
            neutral: Rgb::new(0x80, 0x80, 0x80),
        }
    }
}

impl ColorRamp {
    /// Maps a building's metric value onto the ramp.
    ///
    /// - `value == None` (the building does not qualify for the metric) or an
    ///   empty range: the neutral color
    /// - a degenerate range (`min == max`): the high color
    /// - otherwise: `low` to `high` at the value's clamped position in the range
    ///
    /// # Examples
    ///
    /// ```
    /// use census_engine::{ColorRamp, Rgb};
    /// use census_stats::range::MetricRange;
    ///
    /// let ramp = ColorRamp {
    ///     low: Rgb::new(0, 0, 0),
    ///     high: Rgb::new(200, 100, 0),
    ///     neutral: Rgb::new(9, 9, 9),
    /// };
    /// let range = MetricRange { min: 0.0, max: 10.0 };
    /// assert_eq!(ramp.map(Some(5.0), range), Rgb::new(100, 50, 0));
    /// assert_eq!(ramp.map(None, range), ramp.neutral);
    /// assert_eq!(ramp.map(Some(1.0), MetricRange::EMPTY), ramp.neutral);
    /// ```
    #[must_use]
    pub fn map(&self, value: Option<f32>, range: MetricRange) -> Rgb {
        let Some(value) = value else {
            return self.neutral;
        };
        if range.is_empty() {
            return self.neutral;
        }
        match range.proportion(value) {
            Some(t) => self.low.lerp(self.high, t),
            None => self.high,
        }
    }
}
