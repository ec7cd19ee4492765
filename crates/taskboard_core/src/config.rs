//! Board configuration loaded from TOML.
//!
//! # Responsibility
//! - Describe which task store backs the board and how logging is set up.
//! - Provide complete defaults so an absent file is a valid configuration.
//!
//! # Invariants
//! - Every field has a default; partial files are merged over defaults.
//! - A loaded configuration has passed `BoardConfig::validate`.
//!
//! # Example
//!
//! ```toml
//! [store]
//! backend = "sqlite"
//! sqlite_path = "/var/lib/taskboard/tasks.sqlite3"
//! timeout_secs = 5
//!
//! [logging]
//! level = "debug"
//! dir = "/var/log/taskboard"
//! ```

use crate::logging::default_log_level;
use crate::store::http_store::DEFAULT_BASE_URL;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Which store implementation backs the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Http,
    Sqlite,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Root URL of the REST service; `/todos` is appended.
    pub base_url: String,
    /// Per-request timeout for the HTTP backend.
    pub timeout_secs: u64,
    /// Database file for the SQLite backend.
    pub sqlite_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Http,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sqlite_path: None,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; logging is off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Configuration loading/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "failed to parse config `{}`: {source}", path.display()),
            Self::Parse { path: None, source } => write!(f, "failed to parse config: {source}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from `path`; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "event=config_load module=config status=ok source=defaults path={}",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;

        debug!(
            "event=config_load module=config status=ok source=file path={} backend={:?}",
            path.display(),
            config.store.backend
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|source| ConfigError::Parse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "store.timeout_secs must be greater than zero".to_string(),
            ));
        }
        match self.store.backend {
            StoreBackend::Http => {
                let url = self.store.base_url.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid(format!(
                        "store.base_url must start with http:// or https://, got `{url}`"
                    )));
                }
            }
            StoreBackend::Sqlite => {
                if self.store.sqlite_path.is_none() {
                    return Err(ConfigError::Invalid(
                        "store.sqlite_path is required when store.backend = \"sqlite\"".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
