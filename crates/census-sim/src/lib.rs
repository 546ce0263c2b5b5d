//! A deterministic synthetic city for driving the census engine.
//!
//! [`SyntheticCity`] implements [`census_engine::Host`] over generated
//! citizen, building and household tables. Generation and churn draw from a
//! seeded PCG generator, so a [`CityConfig`] always produces the same city and
//! the same sequence of changes.
//!
//! # Example
//!
//! ```
//! use census_engine::{CensusConfig, census};
//! use census_sim::{CityConfig, SyntheticCity};
//!
//! let config = CityConfig {
//!     citizen_capacity: 1_000,
//!     residential_buildings: 40,
//!     ..CityConfig::default()
//! };
//! let mut city = SyntheticCity::generate(config)?;
//! let (mut writer, reader) = census::channel(CensusConfig::default());
//! while !writer.tick(&city).is_published() {}
//! city.step();
//! assert!(!reader.snapshot().citizens().is_empty());
//! # Ok::<(), census_sim::CityError>(())
//! ```

pub use self::{city::*, config::*};

use rand_distr::NormalError;

mod city;
mod config;
mod population;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CityError {
    #[display("grid width must be positive")]
    EmptyGrid,
    #[display("probability '{name}' must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[display("invalid population distribution")]
    Distribution(NormalError),
}
