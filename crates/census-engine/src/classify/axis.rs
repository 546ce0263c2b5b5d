use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Metric, ParseAxisError, Rgb, classify::AgeGroup};

/// Number of classification axes.
pub const AXIS_COUNT: usize = 12;

/// A demographic dimension every classified citizen has exactly one bucket in.
///
/// Bucket labels and colors live in the [`AxisDefinition`] table; the bucket
/// count of each axis matches the output range of its classifier function in
/// [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Age,
    AgeGroup,
    Education,
    Employment,
    Gender,
    Happiness,
    Health,
    Location,
    ResidentialLevel,
    Student,
    Wealth,
    WellBeing,
}

impl Axis {
    pub const ALL: [Self; AXIS_COUNT] = [
        Self::Age,
        Self::AgeGroup,
        Self::Education,
        Self::Employment,
        Self::Gender,
        Self::Happiness,
        Self::Health,
        Self::Location,
        Self::ResidentialLevel,
        Self::Student,
        Self::Wealth,
        Self::WellBeing,
    ];

    /// Position of the axis in [`Axis::ALL`] and in per-citizen bucket arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn definition(self) -> &'static AxisDefinition {
        &AXES[self.index()]
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        self.definition().key
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    #[must_use]
    pub fn bucket_count(self) -> usize {
        self.definition().bucket_count()
    }

    /// Returns `true` if the axis may be used for histogram columns.
    ///
    /// Every axis can be a row axis; single-year age has too many buckets to
    /// be shown as columns.
    #[must_use]
    pub fn is_column_axis(self) -> bool {
        self != Self::Age
    }

    /// Metric used to color buildings while this axis is selected.
    #[must_use]
    pub fn metric(self) -> Metric {
        match self {
            Self::Age | Self::AgeGroup => Metric::Age,
            Self::Education => Metric::Education,
            Self::Employment => Metric::Employment,
            Self::Gender => Metric::Gender,
            Self::Happiness => Metric::Happiness,
            Self::Health => Metric::Health,
            Self::Location => Metric::Location,
            Self::ResidentialLevel => Metric::ResidentialLevel,
            Self::Student => Metric::Student,
            Self::Wealth => Metric::Wealth,
            Self::WellBeing => Metric::WellBeing,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = ParseAxisError;

    /// Parses an axis key such as `age-group` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|axis| axis.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseAxisError { name: s.to_owned() })
    }
}

/// Display metadata of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub label: &'static str,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buckets {
    Named(&'static [Bucket]),
    /// One bucket per real year of age, `0..=MAX_REAL_AGE`.
    RealAge,
}

/// Bucket metadata for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisDefinition {
    pub axis: Axis,
    /// Stable identifier used in configuration files and on the command line.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    buckets: Buckets,
}

impl AxisDefinition {
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        match self.buckets {
            Buckets::Named(buckets) => buckets.len(),
            Buckets::RealAge => super::MAX_REAL_AGE + 1,
        }
    }

    #[must_use]
    pub fn label(&self, bucket: usize) -> Cow<'static, str> {
        match self.buckets {
            Buckets::Named(buckets) => Cow::Borrowed(buckets[bucket].label),
            Buckets::RealAge => Cow::Owned(bucket.to_string()),
        }
    }

    /// Returns the bar color of a bucket.
    ///
    /// Single-year age buckets take the color of the age group they belong to.
    #[must_use]
    pub fn color(&self, bucket: usize) -> Rgb {
        match self.buckets {
            Buckets::Named(buckets) => buckets[bucket].color,
            Buckets::RealAge => {
                let group = AgeGroup::from_real_age(bucket);
                AGE_GROUP_BUCKETS[group as usize].color
            }
        }
    }

    /// Returns the labels of all buckets in order.
    pub fn labels(&self) -> impl Iterator<Item = Cow<'static, str>> + '_ {
        (0..self.bucket_count()).map(|bucket| self.label(bucket))
    }
}

const fn bucket(label: &'static str, r: u8, g: u8, b: u8) -> Bucket {
    Bucket {
        label,
        color: Rgb::new(r, g, b),
    }
}

const AGE_GROUP_BUCKETS: &[Bucket] = &[
    bucket("Children", 0xf2, 0xc9, 0x4c),
    bucket("Teens", 0xe8, 0x8a, 0x3c),
    bucket("Young Adults", 0x6c, 0xc0, 0x4a),
    bucket("Adults", 0x3e, 0x8e, 0xd0),
    bucket("Seniors", 0x9b, 0x6a, 0xc4),
];

const EDUCATION_BUCKETS: &[Bucket] = &[
    bucket("Uneducated", 0x8c, 0x8c, 0x8c),
    bucket("Educated", 0x74, 0xa9, 0xcf),
    bucket("Well Educated", 0x2b, 0x8c, 0xbe),
    bucket("Highly Educated", 0x04, 0x5a, 0x8d),
];

const EMPLOYMENT_BUCKETS: &[Bucket] = &[
    bucket("Employed", 0x4d, 0xaf, 0x4a),
    bucket("Unemployed", 0xe4, 0x1a, 0x1c),
    bucket("Not Eligible", 0x99, 0x99, 0x99),
];

const GENDER_BUCKETS: &[Bucket] = &[
    bucket("Male", 0x37, 0x7e, 0xb8),
    bucket("Female", 0xe7, 0x29, 0x8a),
];

const HAPPINESS_BUCKETS: &[Bucket] = &[
    bucket("Bad", 0xd7, 0x19, 0x1c),
    bucket("Poor", 0xfd, 0xae, 0x61),
    bucket("Good", 0xff, 0xff, 0xbf),
    bucket("Excellent", 0xa6, 0xd9, 0x6a),
    bucket("Superb", 0x1a, 0x96, 0x41),
];

const HEALTH_BUCKETS: &[Bucket] = &[
    bucket("Very Sick", 0xd7, 0x30, 0x27),
    bucket("Sick", 0xfc, 0x8d, 0x59),
    bucket("Poor Health", 0xfe, 0xe0, 0x8b),
    bucket("Healthy", 0xd9, 0xef, 0x8b),
    bucket("Very Healthy", 0x91, 0xcf, 0x60),
    bucket("Excellent Health", 0x1a, 0x98, 0x50),
];

const LOCATION_BUCKETS: &[Bucket] = &[
    bucket("At Home", 0x66, 0xc2, 0xa5),
    bucket("At Work", 0xfc, 0x8d, 0x62),
    bucket("Visiting", 0x8d, 0xa0, 0xcb),
    bucket("Moving", 0xe7, 0x8a, 0xc3),
];

const RESIDENTIAL_LEVEL_BUCKETS: &[Bucket] = &[
    bucket("Level 1", 0xed, 0xf8, 0xe9),
    bucket("Level 2", 0xba, 0xe4, 0xb3),
    bucket("Level 3", 0x74, 0xc4, 0x76),
    bucket("Level 4", 0x31, 0xa3, 0x54),
    bucket("Level 5", 0x00, 0x6d, 0x2c),
];

const STUDENT_BUCKETS: &[Bucket] = &[
    bucket("Not a Student", 0x99, 0x99, 0x99),
    bucket("Elementary", 0xfe, 0xcc, 0x5c),
    bucket("High School", 0xfd, 0x8d, 0x3c),
    bucket("University", 0xe3, 0x1a, 0x1c),
];

const WEALTH_BUCKETS: &[Bucket] = &[
    bucket("Low Wealth", 0xfe, 0xe6, 0xce),
    bucket("Medium Wealth", 0xfd, 0xae, 0x6b),
    bucket("High Wealth", 0xe6, 0x55, 0x0d),
];

const WELL_BEING_BUCKETS: &[Bucket] = &[
    bucket("Very Unhappy", 0xca, 0x00, 0x20),
    bucket("Unhappy", 0xf4, 0xa5, 0x82),
    bucket("Satisfied", 0xf7, 0xf7, 0xf7),
    bucket("Happy", 0x92, 0xc5, 0xde),
    bucket("Very Happy", 0x05, 0x71, 0xb0),
];

static AXES: [AxisDefinition; AXIS_COUNT] = [
    AxisDefinition {
        axis: Axis::Age,
        key: "age",
        name: "Age",
        buckets: Buckets::RealAge,
    },
    AxisDefinition {
        axis: Axis::AgeGroup,
        key: "age-group",
        name: "Age Group",
        buckets: Buckets::Named(AGE_GROUP_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Education,
        key: "education",
        name: "Education",
        buckets: Buckets::Named(EDUCATION_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Employment,
        key: "employment",
        name: "Employment",
        buckets: Buckets::Named(EMPLOYMENT_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Gender,
        key: "gender",
        name: "Gender",
        buckets: Buckets::Named(GENDER_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Happiness,
        key: "happiness",
        name: "Happiness",
        buckets: Buckets::Named(HAPPINESS_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Health,
        key: "health",
        name: "Health",
        buckets: Buckets::Named(HEALTH_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Location,
        key: "location",
        name: "Location",
        buckets: Buckets::Named(LOCATION_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::ResidentialLevel,
        key: "residential-level",
        name: "Residential Level",
        buckets: Buckets::Named(RESIDENTIAL_LEVEL_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Student,
        key: "student",
        name: "Student",
        buckets: Buckets::Named(STUDENT_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::Wealth,
        key: "wealth",
        name: "Wealth",
        buckets: Buckets::Named(WEALTH_BUCKETS),
    },
    AxisDefinition {
        axis: Axis::WellBeing,
        key: "well-being",
        name: "Well-Being",
        buckets: Buckets::Named(WELL_BEING_BUCKETS),
    },
];
