use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// A running timer older than this many hours is flagged by the scanner.
    #[serde(default = "default_stale_timer_hours")]
    pub stale_timer_hours: i64,
    /// Upper bound on rows returned per scan bucket.
    #[serde(default = "default_scan_list_limit")]
    pub scan_list_limit: i64,
    /// Upper bound on rows printed by the audit log command.
    #[serde(default = "default_audit_list_limit")]
    pub audit_list_limit: i64,
}

fn default_stale_timer_hours() -> i64 {
    8
}
fn default_scan_list_limit() -> i64 {
    50
}
fn default_audit_list_limit() -> i64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            stale_timer_hours: default_stale_timer_hours(),
            scan_list_limit: default_scan_list_limit(),
            audit_list_limit: default_audit_list_limit(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shoptrack")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("shoptrack.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("shoptrack.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_yaml::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Persist the configuration, creating the config directory if needed.
    pub fn save(&self) -> AppResult<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("serialize config: {}", e)))?;
        fs::write(Self::config_file(), yaml)?;
        Ok(())
    }
}
