//! Configuration for sleepscore
//!
//! Loaded from an optional `sleepscore.toml`; every field has a default, and
//! command-line flags override whatever the file sets.
//!
//! # Example sleepscore.toml
//!
//! ```toml
//! dataset_path = "data/kualitas_tidur.csv"
//! history_path = "/var/lib/sleepscore/riwayat_tidur.csv"
//! input_policy = "clamp"
//! ```

use crate::error::{Result, SleepError};
use crate::model::InputPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "sleepscore.toml";

/// Application configuration
///
/// # Example
/// ```
/// use sleepscore::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.history_path.to_str(), Some("riwayat_tidur.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Training dataset, read once at startup
    pub dataset_path: PathBuf,

    /// Append-only prediction history
    pub history_path: PathBuf,

    /// How out-of-range inputs are handled
    pub input_policy: InputPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("kualitas_tidur.csv"),
            history_path: PathBuf::from("riwayat_tidur.csv"),
            input_policy: InputPolicy::Reject,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SleepError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| SleepError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `sleepscore.toml` when it exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dataset_path.as_os_str().is_empty() {
            return Err(SleepError::Config("dataset_path must not be empty".to_string()));
        }

        if self.history_path.as_os_str().is_empty() {
            return Err(SleepError::Config("history_path must not be empty".to_string()));
        }

        if self.dataset_path == self.history_path {
            return Err(SleepError::Config(format!(
                "history_path must differ from dataset_path, both are {}",
                self.dataset_path.display()
            )));
        }

        Ok(())
    }
}
