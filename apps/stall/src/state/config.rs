//! # Configuration
//!
//! Settings loaded once at startup and passed into the session.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STALL_*`)
//! 2. Config file (`stall.toml` in the platform config directory)
//! 3. Defaults (this file)
//!
//! ## Platform Paths
//! - **Linux**: `~/.config/stall-pos/stall.toml`, data in `~/.local/share/stall-pos/`
//! - **macOS**: `~/Library/Application Support/com.stall.stall-pos/`
//! - **Windows**: `%APPDATA%\stall\stall-pos\config\`

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Reset PIN used when none is configured.
pub const DEFAULT_RESET_PIN: u32 = 2580;

/// Store namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "stall";

const CONFIG_FILE: &str = "stall.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: String, reason: String },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StallConfig {
    /// Numeric PIN that gates factory reset.
    pub reset_pin: u32,

    /// Namespace of the durable store; separate namespaces never see each
    /// other's data.
    pub namespace: String,

    /// Directory holding the database and the legacy file.
    pub data_dir: PathBuf,

    /// Database file name inside `data_dir`, or an absolute path.
    pub database_file: PathBuf,

    /// Legacy store file name inside `data_dir`, or an absolute path.
    pub legacy_file: PathBuf,

    /// Where exports are written.
    pub export_dir: PathBuf,
}

impl Default for StallConfig {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        StallConfig {
            reset_pin: DEFAULT_RESET_PIN,
            namespace: DEFAULT_NAMESPACE.to_string(),
            data_dir,
            database_file: PathBuf::from("stall.db"),
            legacy_file: PathBuf::from("legacy_storage.json"),
            export_dir: PathBuf::from("."),
        }
    }
}

impl StallConfig {
    /// Defaults, overlaid with `stall.toml`, overlaid with the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match project_dirs() {
            Some(dirs) => StallConfig::from_file(&dirs.config_dir().join(CONFIG_FILE))?,
            None => StallConfig::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;

        info!(
            namespace = %config.namespace,
            database = %config.database_path().display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reads a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "Reading config file");
                StallConfig::from_toml_str(&text)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(StallConfig::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses TOML; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies environment overrides through `lookup`.
    ///
    /// ## Environment Variables
    /// - `STALL_RESET_PIN`: numeric reset PIN
    /// - `STALL_NAMESPACE`: store namespace
    /// - `STALL_DATA_DIR`: data directory
    /// - `STALL_DB_PATH`: database file path
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(pin) = lookup("STALL_RESET_PIN") {
            self.reset_pin = pin.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "STALL_RESET_PIN".to_string(),
                reason: "must be numeric".to_string(),
            })?;
        }

        if let Some(namespace) = lookup("STALL_NAMESPACE") {
            self.namespace = namespace;
        }

        if let Some(dir) = lookup("STALL_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(path) = lookup("STALL_DB_PATH") {
            self.database_file = PathBuf::from(path);
        }

        Ok(())
    }

    /// Full database path (`database_file` joined onto `data_dir` if relative).
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Full legacy store path.
    pub fn legacy_path(&self) -> PathBuf {
        self.data_dir.join(&self.legacy_file)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stall", "stall-pos")
}
