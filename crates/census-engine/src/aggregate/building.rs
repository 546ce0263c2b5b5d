use std::{fmt, str::FromStr};

use census_stats::{
    mean::{RunningMean, ratio},
    range::MetricRange,
};
use serde::{Deserialize, Serialize};

use crate::{
    ParseMetricError,
    classify::{Axis, ClassifiedCitizen},
    host::DistrictId,
};

use super::DistrictFilter;

pub const METRIC_COUNT: usize = 11;

/// A per-building value used to color buildings on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Mean real age in years.
    Age,
    /// Mean education bucket.
    Education,
    /// Unemployed residents over job-eligible residents.
    Employment,
    /// Fraction of female residents.
    Gender,
    Happiness,
    Health,
    /// Fraction of residents at home.
    Location,
    /// The building's own residential level.
    ResidentialLevel,
    /// Mean enrolled school level over students (`1..=3`).
    Student,
    Wealth,
    WellBeing,
}

impl Metric {
    pub const ALL: [Self; METRIC_COUNT] = [
        Self::Age,
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

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Education => "education",
            Self::Employment => "employment",
            Self::Gender => "gender",
            Self::Happiness => "happiness",
            Self::Health => "health",
            Self::Location => "location",
            Self::ResidentialLevel => "residential-level",
            Self::Student => "student",
            Self::Wealth => "wealth",
            Self::WellBeing => "well-being",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "Average Age",
            Self::Education => "Average Education",
            Self::Employment => "Unemployment Rate",
            Self::Gender => "Female Share",
            Self::Happiness => "Average Happiness",
            Self::Health => "Average Health",
            Self::Location => "Share At Home",
            Self::ResidentialLevel => "Residential Level",
            Self::Student => "Average School Level",
            Self::Wealth => "Average Wealth",
            Self::WellBeing => "Average Well-Being",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseMetricError { name: s.to_owned() })
    }
}

/// Running sums for one building during a scan pass.
///
/// An accumulator exists once any resident has been classified into the
/// building, including residents who are deceased or moving in; only counted
/// residents contribute to the sums. Averages are produced by
/// [`BuildingAccumulator::finalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingAccumulator {
    district: DistrictId,
    residential_level: u8,
    citizen_count: u32,
    age: RunningMean,
    education: RunningMean,
    gender: RunningMean,
    happiness: RunningMean,
    health: RunningMean,
    wealth: RunningMean,
    well_being: RunningMean,
    at_home: u32,
    job_eligible: u32,
    unemployed: u32,
    student: RunningMean,
}

#[expect(clippy::cast_precision_loss)]
fn bucket_value(citizen: &ClassifiedCitizen, axis: Axis) -> f32 {
    citizen.bucket(axis) as f32
}

impl BuildingAccumulator {
    #[must_use]
    pub fn new(district: DistrictId, residential_level: u8) -> Self {
        Self {
            district,
            residential_level,
            citizen_count: 0,
            age: RunningMean::new(),
            education: RunningMean::new(),
            gender: RunningMean::new(),
            happiness: RunningMean::new(),
            health: RunningMean::new(),
            wealth: RunningMean::new(),
            well_being: RunningMean::new(),
            at_home: 0,
            job_eligible: 0,
            unemployed: 0,
            student: RunningMean::new(),
        }
    }

    /// Adds one counted resident.
    ///
    /// `real_age` is the resident's unrounded age in years.
    pub fn add(&mut self, citizen: &ClassifiedCitizen, real_age: f32) {
        debug_assert!(citizen.is_counted());
        self.citizen_count += 1;
        self.age.add(real_age);
        self.education.add(bucket_value(citizen, Axis::Education));
        self.gender.add(bucket_value(citizen, Axis::Gender));
        self.happiness.add(bucket_value(citizen, Axis::Happiness));
        self.health.add(bucket_value(citizen, Axis::Health));
        self.wealth.add(bucket_value(citizen, Axis::Wealth));
        self.well_being.add(bucket_value(citizen, Axis::WellBeing));
        if citizen.bucket(Axis::Location) == 0 {
            self.at_home += 1;
        }
        match citizen.bucket(Axis::Employment) {
            0 => self.job_eligible += 1,
            1 => {
                self.job_eligible += 1;
                self.unemployed += 1;
            }
            _ => {}
        }
        if citizen.bucket(Axis::Student) > 0 {
            self.student.add(bucket_value(citizen, Axis::Student));
        }
    }

    #[must_use]
    pub fn district(&self) -> DistrictId {
        self.district
    }

    #[must_use]
    pub fn residential_level(&self) -> u8 {
        self.residential_level
    }

    #[must_use]
    pub fn citizen_count(&self) -> u32 {
        self.citizen_count
    }

    /// Divides the running sums into averages.
    ///
    /// Each division is guarded on its own denominator, so a building with
    /// residents but no students still reports its other averages.
    #[must_use]
    pub fn finalize(&self) -> BuildingDemographic {
        BuildingDemographic {
            district: self.district,
            residential_level: self.residential_level,
            citizen_count: self.citizen_count,
            age: self.age.mean(),
            education: self.education.mean(),
            gender: self.gender.mean(),
            happiness: self.happiness.mean(),
            health: self.health.mean(),
            wealth: self.wealth.mean(),
            well_being: self.well_being.mean(),
            at_home: ratio(self.at_home, self.citizen_count),
            job_eligible: self.job_eligible,
            unemployment: ratio(self.unemployed, self.job_eligible),
            student_count: self.student.count(),
            student: self.student.mean(),
        }
    }
}

/// Finalized averages of one building in a published snapshot.
///
/// Every average is `None` when its denominator was zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingDemographic {
    pub district: DistrictId,
    pub residential_level: u8,
    /// Residents counted into the averages (neither deceased nor moving in).
    pub citizen_count: u32,
    pub age: Option<f32>,
    pub education: Option<f32>,
    pub gender: Option<f32>,
    pub happiness: Option<f32>,
    pub health: Option<f32>,
    pub wealth: Option<f32>,
    pub well_being: Option<f32>,
    pub at_home: Option<f32>,
    pub job_eligible: u32,
    pub unemployment: Option<f32>,
    pub student_count: u32,
    pub student: Option<f32>,
}

impl BuildingDemographic {
    /// Returns the building's value for `metric`, or `None` if the building
    /// does not qualify for it.
    #[must_use]
    pub fn metric_value(&self, metric: Metric) -> Option<f32> {
        if self.citizen_count == 0 {
            return None;
        }
        match metric {
            Metric::Age => self.age,
            Metric::Education => self.education,
            Metric::Employment => self.unemployment,
            Metric::Gender => self.gender,
            Metric::Happiness => self.happiness,
            Metric::Health => self.health,
            Metric::Location => self.at_home,
            Metric::ResidentialLevel => Some(f32::from(self.residential_level)),
            Metric::Student => self.student,
            Metric::Wealth => self.wealth,
            Metric::WellBeing => self.well_being,
        }
    }

    #[must_use]
    pub fn matches(&self, filter: DistrictFilter) -> bool {
        filter.matches(self.district)
    }
}

/// Per-metric min/max over the qualifying buildings of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBounds {
    ranges: [MetricRange; METRIC_COUNT],
}

impl Default for MetricBounds {
    fn default() -> Self {
        Self {
            ranges: [MetricRange::EMPTY; METRIC_COUNT],
        }
    }
}

impl MetricBounds {
    /// Computes bounds over the buildings that pass `filter`.
    ///
    /// Metrics no building qualifies for keep the empty range.
    pub fn compute<'a, I>(buildings: I, filter: DistrictFilter) -> Self
    where
        I: IntoIterator<Item = &'a BuildingDemographic>,
    {
        let mut bounds = Self::default();
        for building in buildings {
            if !building.matches(filter) {
                continue;
            }
            for metric in Metric::ALL {
                if let Some(value) = building.metric_value(metric) {
                    bounds.ranges[metric.index()].include(value);
                }
            }
        }
        bounds
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> MetricRange {
        self.ranges[metric.index()]
    }
}
