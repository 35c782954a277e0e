//! Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MediTrack Rx";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows per report page
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Prescriptions shown in the dashboard's recent list
pub const DEFAULT_RECENT_LIMIT: usize = 5;

pub const DEFAULT_LOG_FILTER: &str = "info,meditrack_core=debug";

pub const ENV_DB_PATH: &str = "MEDITRACK_DB_PATH";
pub const ENV_PAGE_SIZE: &str = "MEDITRACK_PAGE_SIZE";
pub const ENV_LOG: &str = "MEDITRACK_LOG";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime settings for the core library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps everything in memory
    pub database_path: Option<PathBuf>,
    pub page_size: usize,
    pub recent_limit: usize,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            recent_limit: DEFAULT_RECENT_LIMIT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CoreConfig {
    /// Parse from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Defaults overlaid with `MEDITRACK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup. Split out of [`Self::from_env`] so it
    /// can be driven without touching the process environment.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PAGE_SIZE,
                value: raw.clone(),
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG).or_else(|| lookup("RUST_LOG")) {
            self.log_filter = filter;
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}
