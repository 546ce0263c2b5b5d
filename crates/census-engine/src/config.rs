use serde::{Deserialize, Serialize};

use crate::color::ColorRamp;

/// Number of citizen identifiers scanned per simulation tick.
pub const DEFAULT_SLICE_SIZE: u32 = 8192;

/// Engine configuration.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    /// Citizen identifiers processed per [`crate::CensusWriter::tick`].
    pub slice_size: u32,
    /// Colors used for building queries.
    pub colors: ColorRamp,
    /// Building categories whose residents are counted.
    pub residential_categories: CategoryAllowList,
    /// Building category that makes teens job-eligible while one is operational.
    pub modifier_category: Option<CategoryRule>,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            slice_size: DEFAULT_SLICE_SIZE,
            colors: ColorRamp::default(),
            residential_categories: CategoryAllowList::default(),
            modifier_category: Some(CategoryRule::Exact("HadronColliderAI".to_owned())),
        }
    }
}

/// A predicate over building category tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRule {
    Exact(String),
    Prefix(String),
}

impl CategoryRule {
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::Exact(tag) => category == tag,
            Self::Prefix(prefix) => category.starts_with(prefix.as_str()),
        }
    }
}

/// An ordered list of category rules; a category qualifies if any rule matches.
///
/// Rules for third-party categories that are not present in the host simply
/// never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryAllowList {
    pub rules: Vec<CategoryRule>,
}

impl Default for CategoryAllowList {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::Exact("ResidentialBuildingAI".to_owned()),
                CategoryRule::Prefix("PloppableRICO.".to_owned()),
                CategoryRule::Prefix("CimCareMod.AI.OrphanageAI".to_owned()),
                CategoryRule::Prefix("CimCareMod.AI.NursingHomeAI".to_owned()),
            ],
        }
    }
}

impl CategoryAllowList {
    #[must_use]
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list() {
        let list = CategoryAllowList::default();
        assert!(list.matches("ResidentialBuildingAI"));
        assert!(list.matches("PloppableRICO.GrowableResidentialAI"));
        assert!(list.matches("CimCareMod.AI.NursingHomeAI"));
        assert!(!list.matches("ResidentialBuildingAIx"));
        assert!(!list.matches("CommercialBuildingAI"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CensusConfig = serde_json::from_str(r#"{ "slice_size": 16 }"#).unwrap();
        assert_eq!(config.slice_size, 16);
        assert_eq!(config.colors, ColorRamp::default());
        assert_eq!(config.residential_categories, CategoryAllowList::default());
    }

    #[test]
    fn test_rules_from_json() {
        let config: CensusConfig = serde_json::from_str(
            r##"{
                "residential_categories": [{ "exact": "House" }, { "prefix": "Mod." }],
                "modifier_category": null,
                "colors": { "low": "#000000" }
            }"##,
        )
        .unwrap();
        assert!(config.residential_categories.matches("House"));
        assert!(config.residential_categories.matches("Mod.Flat"));
        assert!(!config.residential_categories.matches("ResidentialBuildingAI"));
        assert_eq!(config.modifier_category, None);
        assert_eq!(config.colors.low, crate::Rgb::new(0, 0, 0));
        assert_eq!(config.colors.high, ColorRamp::default().high);
    }
}
