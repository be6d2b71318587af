//! HeroLog configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::HISTORY_CAPACITY;
use crate::progress::TableThresholds;

/// Main HeroLog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Ingestion behaviour
    pub ingest: IngestConfig,

    /// Progression estimate configuration
    pub progress: ProgressConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .herolog.yml
        let local_config = PathBuf::from(".herolog.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/herolog/herolog.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("herolog").join("herolog.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config is reported later by [`Config::load`].
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => [
                Some(PathBuf::from(".herolog.yml")),
                dirs::config_dir().map(|d| d.join("herolog").join("herolog.yml")),
            ]
            .into_iter()
            .flatten()
            .collect(),
        };

        candidates
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one history file per user
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,

    /// Snapshots retained per user
    #[serde(rename = "history-capacity")]
    pub history_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/herolog on Linux)
        let store_dir = dirs::data_dir()
            .map(|d| d.join("herolog"))
            .unwrap_or_else(|| PathBuf::from(".herolog"))
            .join("history");

        Self {
            store_dir,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

/// Ingestion behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Only treat text as a profile when it carries the game's header and stat markers
    #[serde(rename = "require-markers")]
    pub require_markers: bool,

    /// Hours added to the receive time to get the capture timestamp
    #[serde(rename = "timestamp-offset-hours")]
    pub timestamp_offset_hours: i64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            require_markers: true,
            timestamp_offset_hours: 0,
        }
    }
}

/// Progression estimate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// XP needed to finish a level, by level; unlisted levels use the built-in curve
    pub thresholds: BTreeMap<i64, i64>,
}

impl ProgressConfig {
    pub fn thresholds(&self) -> TableThresholds {
        TableThresholds::new(self.thresholds.clone())
    }
}
