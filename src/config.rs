//! Dashboard configuration.
//!
//! Loaded from a JSON file; every field has a default, so an empty object
//! (or no file at all) yields the stock dashboard.

use crate::constants::{
    DEFAULT_DATASET_LOCATION, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_ROSTER_LOCATION,
    DEFAULT_SERIES_ENTITY, DEFAULT_YEAR, EMISSIONS_COLUMN, ENTITY_COLUMN,
    MAX_COMPARISON_ENTITIES, MAX_SERIES_ENTITIES, MIN_YEAR, YEAR_COLUMN,
};
use crate::data::{DataError, DataResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL or file path of the emissions CSV
    pub dataset_location: String,
    /// URL or file path of the country listing JSON
    pub roster_location: String,
    /// Timeout applied to each HTTP fetch
    pub request_timeout_secs: u64,
    pub columns: ColumnMapping,
    pub limits: SelectionLimits,
    pub defaults: ViewDefaults,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_location: DEFAULT_DATASET_LOCATION.to_string(),
            roster_location: DEFAULT_ROSTER_LOCATION.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            columns: ColumnMapping::default(),
            limits: SelectionLimits::default(),
            defaults: ViewDefaults::default(),
        }
    }
}

/// Header names of the columns the parser reads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub entity: String,
    pub year: String,
    pub emissions: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            entity: ENTITY_COLUMN.to_string(),
            year: YEAR_COLUMN.to_string(),
            emissions: EMISSIONS_COLUMN.to_string(),
        }
    }
}

/// Selection caps enforced by the selection guard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionLimits {
    /// Distinct entities in the time series view
    pub max_series_entities: usize,
    /// Countries + regions in the regional comparison view
    pub max_comparison_entities: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            max_series_entities: MAX_SERIES_ENTITIES,
            max_comparison_entities: MAX_COMPARISON_ENTITIES,
        }
    }
}

/// Seeds applied once when a view is created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub year: i32,
    pub series_entities: Vec<String>,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            series_entities: vec![DEFAULT_SERIES_ENTITY.to_string()],
        }
    }
}

impl DashboardConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> DataResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded dashboard config");
        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> DataResult<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> DataResult<()> {
        if self.limits.max_series_entities == 0 {
            return Err(DataError::Config(
                "limits.max_series_entities must be at least 1".to_string(),
            ));
        }
        if self.limits.max_comparison_entities == 0 {
            return Err(DataError::Config(
                "limits.max_comparison_entities must be at least 1".to_string(),
            ));
        }
        if self.defaults.year < MIN_YEAR {
            return Err(DataError::Config(format!(
                "defaults.year {} is before {}",
                self.defaults.year, MIN_YEAR
            )));
        }
        if self.defaults.series_entities.len() > self.limits.max_series_entities {
            return Err(DataError::Config(format!(
                "defaults.series_entities has {} entries (max {})",
                self.defaults.series_entities.len(),
                self.limits.max_series_entities
            )));
        }
        if self.dataset_location.trim().is_empty() {
            return Err(DataError::Config("dataset_location is empty".to_string()));
        }
        Ok(())
    }
}

/// `<config dir>/co2board/config.json`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("co2board").join("config.json"))
}
