use serde::{Deserialize, Serialize};

use crate::CityError;

/// Parameters of a generated city.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Seed of the generator; the same seed always yields the same city.
    pub seed: u64,
    /// Size of the citizen table, including unused slots.
    pub citizen_capacity: u32,
    pub residential_buildings: u32,
    /// Workplaces; they house nobody.
    pub commercial_buildings: u32,
    /// Number of districts the map is split into (0 leaves the whole map unassigned).
    pub districts: u8,
    /// Buildings per row of the map grid.
    pub grid_width: u32,
    /// Fraction of citizen slots in use after generation.
    pub occupancy: f64,
    /// Fraction of in-use citizen slots held by tourists.
    pub tourist_ratio: f64,
    /// Place one building of the category that makes teens job-eligible.
    pub hadron_collider: bool,
    pub population: PopulationConfig,
    pub churn: ChurnConfig,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            citizen_capacity: 65_536,
            residential_buildings: 2_000,
            commercial_buildings: 300,
            districts: 6,
            grid_width: 64,
            occupancy: 0.8,
            tourist_ratio: 0.05,
            hadron_collider: false,
            population: PopulationConfig::default(),
            churn: ChurnConfig::default(),
        }
    }
}

impl CityConfig {
    pub(crate) fn validate(&self) -> Result<(), CityError> {
        if self.grid_width == 0 {
            return Err(CityError::EmptyGrid);
        }
        let probabilities = [
            ("occupancy", self.occupancy),
            ("tourist_ratio", self.tourist_ratio),
            ("churn.aging", self.churn.aging),
            ("churn.death", self.churn.death),
            ("churn.move_in", self.churn.move_in),
            ("churn.abandon", self.churn.abandon),
            ("churn.restore", self.churn.restore),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(CityError::Probability { name, value });
            }
        }
        Ok(())
    }
}

/// Normal distributions citizen attributes are drawn from.
///
/// Samples are clamped to the valid range of each attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Mean age in host units.
    pub age_mean: f32,
    pub age_std_dev: f32,
    /// Mean of happiness, health and well-being.
    pub wellness_mean: f32,
    pub wellness_std_dev: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            age_mean: 130.0,
            age_std_dev: 85.0,
            wellness_mean: 60.0,
            wellness_std_dev: 20.0,
        }
    }
}

/// Per-step probabilities of [`crate::SyntheticCity::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnConfig {
    /// Chance that a citizen ages by one host unit.
    pub aging: f64,
    /// Chance that a senior dies.
    pub death: f64,
    /// Chance that an empty slot is taken by a citizen moving in.
    pub move_in: f64,
    /// Chance that a completed residential building is abandoned.
    pub abandon: f64,
    /// Chance that an abandoned building is restored.
    pub restore: f64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            aging: 0.05,
            death: 0.002,
            move_in: 0.01,
            abandon: 0.000_5,
            restore: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: CityConfig =
            serde_json::from_str(r#"{ "seed": 7, "churn": { "death": 0.5 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.citizen_capacity, CityConfig::default().citizen_capacity);
        assert_eq!(config.churn.death, 0.5);
        assert_eq!(config.churn.aging, ChurnConfig::default().aging);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probabilities_are_validated() {
        let mut config = CityConfig::default();
        config.churn.move_in = 1.5;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "probability 'churn.move_in' must be within [0, 1], got 1.5"
        );
    }
}
