//! Configuration loading.
//!
//! The config file is YAML, located by (in order): an explicit path, the
//! `TASKPULSE_CONFIG` environment variable, `./taskpulse.yaml`, or
//! `<config_dir>/taskpulse/config.yaml`. A missing file means defaults;
//! CLI flags override file values in `main`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8642;

/// Default energy-log retention window in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to bind the HTTP listener to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port for the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Retention settings for append-only data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Energy logs older than this many days are removed by the cleanup
    /// subcommand.
    #[serde(default = "default_retention_days")]
    pub energy_log_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            energy_log_days: default_retention_days(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("taskpulse.db")
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl Config {
    /// Load configuration, falling back to defaults when no file is found.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None => discover_config_path(),
        };

        match path {
            Some(path) if path.exists() => Self::from_file(&path),
            // An explicit path that does not exist is still an error;
            // discovered paths just mean "no config yet".
            Some(path) if explicit_path.is_some() => Err(ConfigError::Read {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                path,
            }),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create the database file's parent directory if needed.
    pub fn ensure_db_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Find a config file via env var, working directory, or the user config
/// directory.
fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TASKPULSE_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from("taskpulse.yaml");
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir().map(|dir| dir.join("taskpulse").join("config.yaml"))
}
