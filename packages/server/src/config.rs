//! Server configuration.
//!
//! Settings come from an optional TOML file named by
//! [`CONFIG_PATH_ENV`], then individual environment variables override
//! single fields:
//!
//! | Variable | Field |
//! |---|---|
//! | `BIND_ADDR` | `bind_addr` |
//! | `PORT` | `port` |
//! | `SURVEY_INSIGHTS_DATA_DIR` | `data_dir` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use survey_insights_dataset::paths::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use thiserror::Error;

/// Environment variable naming the TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "SURVEY_INSIGHTS_CONFIG";

/// Default request body limit for dataset uploads (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ServerConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override has an unusable value.
    #[error("Invalid value '{value}' for {variable}")]
    InvalidOverride {
        /// Environment variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory uploaded datasets are stored in.
    pub data_dir: PathBuf,
    /// Whether to allow any origin (otherwise same-origin only).
    pub cors_permissive: bool,
    /// Optional directory of front-end files served at `/`.
    pub static_dir: Option<PathBuf>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cors_permissive: true,
            static_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or an
    /// override is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading config from {path}");
                Self::from_file(Path::new(&path))?
            }
            _ => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies environment-style overrides read through `lookup`.
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `PORT` is not a valid
    /// port number.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(bind_addr) = get("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = get("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride {
                    variable: "PORT",
                    value: port.clone(),
                })?;
        }
        if let Some(data_dir) = get(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(data_dir);
        }

        Ok(())
    }
}
