//! Caller-side persistence: SQLite task store and TOML configuration.
//!
//! The scheduling engine itself never touches storage; the CLI (or any
//! other frontend) loads tasks and constraints from here, feeds them to the
//! engine, and writes the returned schedule back.

mod config;
mod database;

pub use config::{PlannerConfig, SchedulerSection};
pub use database::PlannerDb;

use std::path::PathBuf;

/// Returns `~/.local/share/dayflow[-dev]/` based on DAYFLOW_ENV.
///
/// Set DAYFLOW_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));

    let env = std::env::var("DAYFLOW_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("dayflow-dev")
    } else {
        base_dir.join("dayflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns `~/.config/dayflow[-dev]/` based on DAYFLOW_ENV.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn config_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));

    let env = std::env::var("DAYFLOW_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("dayflow-dev")
    } else {
        base_dir.join("dayflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
