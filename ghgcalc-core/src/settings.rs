//! User settings, loaded from TOML.
//!
//! ```toml
//! precision = 4
//! export_path = "results.csv"
//! chart = true
//! chart_width = 40
//! ```
//!
//! Missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{GhgError, GhgResult};

/// Decimal places used when displaying a result.
pub const DEFAULT_PRECISION: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Decimal places of the formatted result
    /// default: 4
    pub precision: usize,

    /// Where `export` writes the history when no path is given
    /// default: results.csv
    pub export_path: PathBuf,

    /// Redraw the history chart after every calculation
    /// default: true
    pub chart: bool,

    /// Width of the longest chart bar, in characters
    /// default: 40
    pub chart_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            export_path: PathBuf::from("results.csv"),
            chart: true,
            chart_width: 40,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> GhgResult<Self> {
        toml::from_str(text).map_err(|e| GhgError::Settings(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> GhgResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GhgError::Settings(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> GhgResult<String> {
        toml::to_string(self).map_err(|e| GhgError::Settings(e.to_string()))
    }
}
