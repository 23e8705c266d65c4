//! TOML-based application configuration.
//!
//! Stores scheduler preferences (planning horizon and the daily scheduling
//! window). Configuration lives at `~/.config/dayflow/config.toml`; a
//! missing file yields defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config_dir;
use crate::error::ConfigError;
use crate::scheduler::SchedulerConfig;

fn default_horizon_days() -> u64 {
    14
}

fn default_day_start_hour() -> u32 {
    8
}

fn default_day_end_hour() -> u32 {
    20
}

/// Scheduler-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSection {
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u64,
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

impl PlannerConfig {
    /// Load the configuration from the default location, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save the configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The engine configuration this file describes.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            horizon_days: self.scheduler.horizon_days,
            day_start_hour: self.scheduler.day_start_hour,
            day_end_hour: self.scheduler.day_end_hour,
        }
    }

    fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = config_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/dayflow"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlannerConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.scheduler.horizon_days, 14);
        assert_eq!(config.scheduler.day_start_hour, 8);
        assert_eq!(config.scheduler.day_end_hour, 20);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = PlannerConfig::default();
        config.scheduler.horizon_days = 7;
        config.scheduler.day_end_hour = 18;
        config.save_to(&path).unwrap();

        let loaded = PlannerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.scheduler.horizon_days, 7);
        assert_eq!(loaded.scheduler.day_end_hour, 18);

        let engine = loaded.scheduler_config();
        assert_eq!(engine.horizon_days, 7);
        assert_eq!(engine.day_start_hour, 8);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scheduler]\nhorizon_days = 21\n").unwrap();

        let config = PlannerConfig::load_from(&path).unwrap();
        assert_eq!(config.scheduler.horizon_days, 21);
        assert_eq!(config.scheduler.day_start_hour, 8);
    }
}
