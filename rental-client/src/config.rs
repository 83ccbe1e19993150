//! Configuration loading for sixcities-client.
//!
//! Configuration is loaded from a TOML file (default: `config.toml` in the
//! data directory). Every section and field is optional.

use rental_core::{AppState, SortKey};
use rental_types::CityName;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API endpoint configuration.
    pub api: ApiConfig,
    /// Session token storage.
    pub session: SessionConfig,
    /// Initial view state and error display.
    pub ui: UiConfig,
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every route is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 5).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Session token storage.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Token file; relative paths resolve against the data directory.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

/// Initial view state and error display.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// City selected at startup (default: Paris).
    #[serde(default)]
    pub default_city: CityName,
    /// Sort order applied to the first catalog load (default: Popular).
    #[serde(default)]
    pub default_sort: SortKey,
    /// Delay before a transient error is cleared, in ms (default: 2000).
    #[serde(default = "default_error_clear_delay_ms")]
    pub error_clear_delay_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3000/six-cities".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token")
}

fn default_error_clear_delay_ms() -> u64 {
    2000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_city: CityName::default(),
            default_sort: SortKey::default(),
            error_clear_delay_ms: default_error_clear_delay_ms(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    /// Token file path resolved against `data_dir`.
    pub fn token_path(&self, data_dir: &Path) -> PathBuf {
        if self.token_file.is_absolute() {
            self.token_file.clone()
        } else {
            data_dir.join(&self.token_file)
        }
    }
}

impl UiConfig {
    /// Error clear delay as a `Duration`.
    pub fn error_clear_delay(&self) -> Duration {
        Duration::from_millis(self.error_clear_delay_ms)
    }

    /// Initial state with the configured city selected.
    pub fn initial_state(&self) -> AppState {
        AppState {
            city_name: self.default_city,
            ..AppState::default()
        }
    }
}

impl ClientConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

        Self::from_toml_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub async fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
