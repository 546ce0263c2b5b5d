//! Classification of one citizen into a bucket on every [`Axis`].
//!
//! Every function here is total: each legal input maps to exactly one bucket
//! in `0..axis.bucket_count()`. Coded attributes are typed enums, so they
//! cannot be out of range; numeric attributes are clamped.

pub use self::axis::*;

mod axis;

use crate::host::{
    BuildingId, CitizenId, CitizenRecord, DistrictId, Education, Gender, Location, SchoolLevel,
    Wealth,
};

/// Oldest age the host assigns, in host age units.
pub const MAX_GAME_AGE: u16 = 400;
/// Host age units per real year.
pub const GAME_AGE_PER_REAL_AGE: f32 = 3.5;
/// Oldest real age with its own bucket on [`Axis::Age`].
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const MAX_REAL_AGE: usize = (MAX_GAME_AGE as f32 / GAME_AGE_PER_REAL_AGE) as usize;

const HAPPINESS_THRESHOLDS: [u8; 4] = [25, 40, 55, 70];
const HEALTH_THRESHOLDS: [u8; 5] = [11, 26, 41, 56, 71];
const WELL_BEING_THRESHOLDS: [u8; 4] = [20, 40, 60, 80];

/// Host age limits (exclusive) of each age group but the last.
const AGE_GROUP_LIMITS: [u16; 4] = [15, 45, 90, 180];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AgeGroup {
    Child,
    Teen,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    const ALL: [Self; 5] = [
        Self::Child,
        Self::Teen,
        Self::YoungAdult,
        Self::Adult,
        Self::Senior,
    ];

    #[must_use]
    pub fn from_game_age(age: u16) -> Self {
        Self::ALL[AGE_GROUP_LIMITS.iter().filter(|&&limit| age >= limit).count()]
    }

    /// Age group of the youngest host age that falls in real-age bucket `real_age`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn from_real_age(real_age: usize) -> Self {
        let real_age = u16::try_from(real_age).unwrap_or(u16::MAX);
        let game_age = (f32::from(real_age) * GAME_AGE_PER_REAL_AGE).ceil() as u16;
        Self::from_game_age(game_age)
    }
}

/// Pass-wide inputs that change how individual citizens are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifyContext {
    /// Set while an operational building of the modifier category exists.
    pub teens_job_eligible: bool,
}

/// Converts a host age into real years.
///
/// # Examples
///
/// ```
/// # use census_engine::classify::real_age;
/// assert_eq!(real_age(35), 10.0);
/// assert_eq!(real_age(175), 50.0);
/// ```
#[must_use]
pub fn real_age(game_age: u16) -> f32 {
    f32::from(game_age.min(MAX_GAME_AGE)) / GAME_AGE_PER_REAL_AGE
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn age_bucket(game_age: u16) -> usize {
    (real_age(game_age) as usize).min(MAX_REAL_AGE)
}

#[must_use]
pub fn age_group_bucket(game_age: u16) -> usize {
    AgeGroup::from_game_age(game_age) as usize
}

#[must_use]
pub fn education_bucket(education: Education) -> usize {
    education as usize
}

/// Returns `true` if the citizen counts towards the job-eligible population.
///
/// Young adults and adults are eligible; teens only under the pass-wide
/// modifier. Students are never eligible.
#[must_use]
pub fn is_job_eligible(record: &CitizenRecord, context: ClassifyContext) -> bool {
    if record.school.is_some() {
        return false;
    }
    match AgeGroup::from_game_age(record.age) {
        AgeGroup::YoungAdult | AgeGroup::Adult => true,
        AgeGroup::Teen => context.teens_job_eligible,
        AgeGroup::Child | AgeGroup::Senior => false,
    }
}

/// 0: employed, 1: unemployed, 2: not eligible.
#[must_use]
pub fn employment_bucket(record: &CitizenRecord, context: ClassifyContext) -> usize {
    match (
        is_job_eligible(record, context),
        record.work_building.is_some(),
    ) {
        (true, true) => 0,
        (true, false) => 1,
        (false, _) => 2,
    }
}

#[must_use]
pub fn gender_bucket(gender: Gender) -> usize {
    gender as usize
}

fn threshold_bucket(value: u8, thresholds: &[u8]) -> usize {
    thresholds.iter().filter(|&&limit| value >= limit).count()
}

#[must_use]
pub fn happiness_bucket(happiness: u8) -> usize {
    threshold_bucket(happiness.min(100), &HAPPINESS_THRESHOLDS)
}

#[must_use]
pub fn health_bucket(health: u8) -> usize {
    threshold_bucket(health.min(100), &HEALTH_THRESHOLDS)
}

#[must_use]
pub fn location_bucket(location: Location) -> usize {
    location as usize
}

/// Residential levels `1..=5` map to buckets `0..=4`; out-of-range levels are clamped.
#[must_use]
pub fn residential_level_bucket(level: u8) -> usize {
    usize::from(level.clamp(1, 5) - 1)
}

/// Bucket 0 is "not a student"; enrolled levels are shifted up by one.
#[must_use]
pub fn student_bucket(school: Option<SchoolLevel>) -> usize {
    school.map_or(0, |level| level as usize + 1)
}

#[must_use]
pub fn wealth_bucket(wealth: Wealth) -> usize {
    wealth as usize
}

#[must_use]
pub fn well_being_bucket(wellbeing: u8) -> usize {
    threshold_bucket(wellbeing.min(100), &WELL_BEING_THRESHOLDS)
}

/// The home a citizen is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Home {
    pub building: BuildingId,
    pub district: DistrictId,
    pub residential_level: u8,
}

/// One citizen reduced to its bucket on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedCitizen {
    pub id: CitizenId,
    pub building: BuildingId,
    pub district: DistrictId,
    pub dead: bool,
    pub moving_in: bool,
    buckets: [u8; AXIS_COUNT],
}

impl ClassifiedCitizen {
    /// Returns the citizen's bucket on `axis`.
    #[must_use]
    pub fn bucket(&self, axis: Axis) -> usize {
        usize::from(self.buckets[axis.index()])
    }

    /// Returns `true` for citizens counted in the regular histogram cells,
    /// i.e. neither deceased nor moving in.
    #[must_use]
    pub fn is_counted(&self) -> bool {
        !self.dead && !self.moving_in
    }
}

/// Classifies `record` on every axis.
///
/// # Examples
///
/// ```
/// use census_engine::{
///     Axis, CitizenKind, CitizenRecord, ClassifyContext, Education, Gender, Location, Wealth,
///     classify::{Home, classify},
/// };
///
/// let record = CitizenRecord {
///     kind: CitizenKind::Resident,
///     dead: false,
///     moving_in: false,
///     home_building: Some(7),
///     work_building: None,
///     age: 10,
///     education: Education::Uneducated,
///     gender: Gender::Female,
///     happiness: 50,
///     health: 80,
///     wellbeing: 90,
///     location: Location::Home,
///     wealth: Wealth::Medium,
///     school: None,
/// };
/// let home = Home { building: 7, district: 0, residential_level: 2 };
/// let citizen = classify(1, &record, home, ClassifyContext::default());
/// assert_eq!(citizen.bucket(Axis::AgeGroup), 0);
/// assert_eq!(citizen.bucket(Axis::ResidentialLevel), 1);
/// assert_eq!(citizen.bucket(Axis::Employment), 2);
/// ```
#[expect(clippy::cast_possible_truncation)]
#[must_use]
pub fn classify(
    id: CitizenId,
    record: &CitizenRecord,
    home: Home,
    context: ClassifyContext,
) -> ClassifiedCitizen {
    let mut buckets = [0; AXIS_COUNT];
    for axis in Axis::ALL {
        let bucket = match axis {
            Axis::Age => age_bucket(record.age),
            Axis::AgeGroup => age_group_bucket(record.age),
            Axis::Education => education_bucket(record.education),
            Axis::Employment => employment_bucket(record, context),
            Axis::Gender => gender_bucket(record.gender),
            Axis::Happiness => happiness_bucket(record.happiness),
            Axis::Health => health_bucket(record.health),
            Axis::Location => location_bucket(record.location),
            Axis::ResidentialLevel => residential_level_bucket(home.residential_level),
            Axis::Student => student_bucket(record.school),
            Axis::Wealth => wealth_bucket(record.wealth),
            Axis::WellBeing => well_being_bucket(record.wellbeing),
        };
        debug_assert!(bucket < axis.bucket_count(), "{axis:?} bucket {bucket}");
        buckets[axis.index()] = bucket as u8;
    }
    ClassifiedCitizen {
        id,
        building: home.building,
        district: home.district,
        dead: record.dead,
        moving_in: record.moving_in,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_max_real_age() {
        assert_eq!(MAX_REAL_AGE, 114);
        assert_eq!(age_bucket(0), 0);
        assert_eq!(age_bucket(MAX_GAME_AGE), MAX_REAL_AGE);
        assert_eq!(age_bucket(u16::MAX), MAX_REAL_AGE);
    }

    #[test]
    fn test_age_group_limits() {
        assert_eq!(AgeGroup::from_game_age(14), AgeGroup::Child);
        assert_eq!(AgeGroup::from_game_age(15), AgeGroup::Teen);
        assert_eq!(AgeGroup::from_game_age(89), AgeGroup::YoungAdult);
        assert_eq!(AgeGroup::from_game_age(90), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_game_age(180), AgeGroup::Senior);
        assert_eq!(AgeGroup::from_game_age(u16::MAX), AgeGroup::Senior);
    }

    #[test]
    fn test_every_input_maps_into_range() {
        let context_values = [
            ClassifyContext::default(),
            ClassifyContext {
                teens_job_eligible: true,
            },
        ];
        let home = Home {
            building: 0,
            district: 0,
            residential_level: 0,
        };
        for age in (0..=MAX_GAME_AGE + 10).step_by(7) {
            for value in (0..=u8::MAX).step_by(5) {
                let mut record = testing::citizen(age);
                record.happiness = value;
                record.health = value;
                record.wellbeing = value;
                record.school = Some(SchoolLevel::University);
                for context in context_values {
                    for level in [0, 1, 5, 9] {
                        let home = Home {
                            residential_level: level,
                            ..home
                        };
                        let citizen = classify(1, &record, home, context);
                        for axis in Axis::ALL {
                            assert!(citizen.bucket(axis) < axis.bucket_count());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_student_shift() {
        assert_eq!(student_bucket(None), 0);
        assert_eq!(student_bucket(Some(SchoolLevel::Elementary)), 1);
        assert_eq!(student_bucket(Some(SchoolLevel::University)), 3);
        assert_eq!(Axis::Student.bucket_count(), 4);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(happiness_bucket(0), 0);
        assert_eq!(happiness_bucket(24), 0);
        assert_eq!(happiness_bucket(25), 1);
        assert_eq!(happiness_bucket(100), 4);
        assert_eq!(health_bucket(10), 0);
        assert_eq!(health_bucket(11), 1);
        assert_eq!(health_bucket(255), 5);
        assert_eq!(well_being_bucket(79), 3);
        assert_eq!(well_being_bucket(80), 4);
    }

    #[test]
    fn test_job_eligibility() {
        let teen = testing::citizen(30);
        let adult = testing::citizen(120);
        let modifier = ClassifyContext {
            teens_job_eligible: true,
        };
        assert!(!is_job_eligible(&teen, ClassifyContext::default()));
        assert!(is_job_eligible(&teen, modifier));
        assert!(is_job_eligible(&adult, ClassifyContext::default()));

        let student = CitizenRecord {
            school: Some(SchoolLevel::University),
            ..adult
        };
        assert!(!is_job_eligible(&student, modifier));

        let employed = CitizenRecord {
            work_building: Some(3),
            ..adult
        };
        assert_eq!(employment_bucket(&employed, ClassifyContext::default()), 0);
        assert_eq!(employment_bucket(&adult, ClassifyContext::default()), 1);
        assert_eq!(employment_bucket(&teen, ClassifyContext::default()), 2);
    }
}
