use census_engine::{
    AgeGroup, BuildingId, CitizenKind, CitizenRecord, Education, Gender, Location, MAX_GAME_AGE,
    SchoolLevel, Wealth,
};
use rand::{Rng, seq::IndexedRandom as _};
use rand_distr::{Distribution as _, Normal, NormalError};

use crate::PopulationConfig;

/// Draws the attributes of newly generated citizens.
#[derive(Debug, Clone)]
pub(crate) struct CitizenSampler {
    age: Normal<f32>,
    wellness: Normal<f32>,
}

impl CitizenSampler {
    pub(crate) fn new(config: &PopulationConfig) -> Result<Self, NormalError> {
        Ok(Self {
            age: Normal::new(config.age_mean, config.age_std_dev)?,
            wellness: Normal::new(config.wellness_mean, config.wellness_std_dev)?,
        })
    }

    pub(crate) fn resident<R>(
        &self,
        rng: &mut R,
        home: BuildingId,
        workplaces: &[BuildingId],
    ) -> CitizenRecord
    where
        R: Rng + ?Sized,
    {
        let age = self.sample_age(rng);
        let group = AgeGroup::from_game_age(age);
        let school = sample_school(rng, group);
        let working_age = matches!(group, AgeGroup::YoungAdult | AgeGroup::Adult);
        let work_building = if working_age && school.is_none() && rng.random_bool(0.85) {
            workplaces.choose(rng).copied()
        } else {
            None
        };
        let location = match rng.random_range(0..10) {
            0..=4 => Location::Home,
            5..=6 if work_building.is_some() => Location::Work,
            5..=8 => Location::Visit,
            _ => Location::Moving,
        };
        CitizenRecord {
            kind: CitizenKind::Resident,
            dead: false,
            moving_in: false,
            home_building: Some(home),
            work_building,
            age,
            education: sample_education(rng, group),
            gender: if rng.random_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            },
            happiness: self.sample_wellness(rng),
            health: self.sample_wellness(rng),
            wellbeing: self.sample_wellness(rng),
            location,
            wealth: match rng.random_range(0..10) {
                0..=3 => Wealth::Low,
                4..=7 => Wealth::Medium,
                _ => Wealth::High,
            },
            school,
        }
    }

    pub(crate) fn tourist<R>(&self, rng: &mut R) -> CitizenRecord
    where
        R: Rng + ?Sized,
    {
        CitizenRecord {
            kind: CitizenKind::Tourist,
            home_building: None,
            work_building: None,
            school: None,
            location: Location::Visit,
            ..self.resident(rng, 0, &[])
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sample_age<R>(&self, rng: &mut R) -> u16
    where
        R: Rng + ?Sized,
    {
        let age = self.age.sample(rng).clamp(0.0, f32::from(MAX_GAME_AGE));
        age as u16
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sample_wellness<R>(&self, rng: &mut R) -> u8
    where
        R: Rng + ?Sized,
    {
        self.wellness.sample(rng).clamp(0.0, 100.0) as u8
    }
}

fn sample_school<R>(rng: &mut R, group: AgeGroup) -> Option<SchoolLevel>
where
    R: Rng + ?Sized,
{
    let (level, chance) = match group {
        AgeGroup::Child => (SchoolLevel::Elementary, 0.9),
        AgeGroup::Teen => (SchoolLevel::HighSchool, 0.7),
        AgeGroup::YoungAdult => (SchoolLevel::University, 0.3),
        AgeGroup::Adult | AgeGroup::Senior => return None,
    };
    rng.random_bool(chance).then_some(level)
}

fn sample_education<R>(rng: &mut R, group: AgeGroup) -> Education
where
    R: Rng + ?Sized,
{
    const LEVELS: [Education; 4] = [
        Education::Uneducated,
        Education::OneSchool,
        Education::TwoSchools,
        Education::ThreeSchools,
    ];
    let max = match group {
        AgeGroup::Child => 0,
        AgeGroup::Teen => 1,
        AgeGroup::YoungAdult => 2,
        AgeGroup::Adult | AgeGroup::Senior => 3,
    };
    LEVELS[rng.random_range(0..=max)]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_resident_attributes_are_consistent() {
        let sampler = CitizenSampler::new(&PopulationConfig::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..2_000 {
            let citizen = sampler.resident(&mut rng, 3, &[10, 11]);
            assert!(citizen.is_resident());
            assert_eq!(citizen.home_building, Some(3));
            assert!(citizen.age <= MAX_GAME_AGE);
            assert!(citizen.happiness <= 100);
            if citizen.work_building.is_some() {
                assert!(citizen.school.is_none());
            } else {
                assert_ne!(citizen.location, Location::Work);
            }
            if AgeGroup::from_game_age(citizen.age) == AgeGroup::Child {
                assert_eq!(citizen.education, Education::Uneducated);
            }
        }
    }

    #[test]
    fn test_tourist_has_no_home() {
        let sampler = CitizenSampler::new(&PopulationConfig::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(2);
        let tourist = sampler.tourist(&mut rng);
        assert!(!tourist.is_resident());
        assert_eq!(tourist.home_building, None);
    }

    #[test]
    fn test_invalid_distribution() {
        let config = PopulationConfig {
            age_std_dev: f32::NAN,
            ..PopulationConfig::default()
        };
        assert!(CitizenSampler::new(&config).is_err());
    }
}
