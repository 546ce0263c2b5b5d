use std::path::Path;

use census_engine::{Axis, DisplayMode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::util;

/// Panel settings restored at startup and written back on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPreferences {
    pub row_axis: Axis,
    pub column_axis: Axis,
    pub display: DisplayMode,
    pub panel_visible: bool,
}

impl Default for PanelPreferences {
    fn default() -> Self {
        Self {
            row_axis: Axis::AgeGroup,
            column_axis: Axis::Education,
            display: DisplayMode::Count,
            panel_visible: true,
        }
    }
}

impl PanelPreferences {
    /// Loads preferences from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no panel preferences, using defaults");
            return Ok(Self::default());
        }
        let prefs: Self = util::read_json("panel preferences", path)?;
        Ok(prefs.sanitized())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        util::write_json(self, Some(path))
    }

    /// Replaces a column axis that cannot be shown as columns.
    #[must_use]
    pub fn sanitized(self) -> Self {
        if self.column_axis.is_column_axis() {
            return self;
        }
        warn!(axis = %self.column_axis, "axis cannot be used for columns");
        Self {
            column_axis: Self::default().column_axis,
            ..self
        }
    }
}
