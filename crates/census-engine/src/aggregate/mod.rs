//! Aggregates derived from classified citizens: per-building averages with
//! their metric bounds, and the row × column histogram of the population panel.

pub use self::{building::*, rows::*};

use serde::{Deserialize, Serialize};

use crate::host::DistrictId;

mod building;
mod rows;

/// Restricts histograms and metric bounds to part of the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistrictFilter {
    #[default]
    EntireCity,
    District(DistrictId),
}

impl DistrictFilter {
    #[must_use]
    pub fn matches(self, district: DistrictId) -> bool {
        match self {
            Self::EntireCity => true,
            Self::District(selected) => selected == district,
        }
    }
}
