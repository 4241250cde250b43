//! Configuration Management
//!
//! Provider settings are read from a JSON file and then overridden from the
//! environment (`TENCENTCLOUD_SECRET_ID`, `TENCENTCLOUD_SECRET_KEY`,
//! `TENCENTCLOUD_REGION`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
pub const ENV_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";
pub const ENV_REGION: &str = "TENCENTCLOUD_REGION";

const DEFAULT_REGION: &str = "ap-guangzhou";
const DEFAULT_PAGE_SIZE: u64 = 100;
const MAX_PAGE_SIZE: u64 = 100;

/// Errors raised while loading or checking the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing credentials: set secret_id/secret_key or {ENV_SECRET_ID}/{ENV_SECRET_KEY}")]
    MissingCredentials,
}

/// Polling bounds for asynchronous MySQL requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncPollConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_max_attempts() -> u32 {
    120
}

fn default_interval_secs() -> u64 {
    5
}

impl Default for AsyncPollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl AsyncPollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// API key pair
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"******")
            .finish()
    }
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub secret_id: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Base URL replacing `https://{service}.tencentcloudapi.com`
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Limit sent with every paginated listing call
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub async_poll: AsyncPollConfig,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            secret_id: None,
            secret_key: None,
            endpoint: None,
            page_size: default_page_size(),
            async_poll: AsyncPollConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(io_err)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup; empty values are ignored
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(id) = lookup(ENV_SECRET_ID) {
            self.secret_id = Some(id);
        }
        if let Some(key) = lookup(ENV_SECRET_KEY) {
            self.secret_key = Some(key);
        }
        if let Some(region) = lookup(ENV_REGION) {
            self.region = region;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid("region must not be empty".to_string()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "page_size must be in [1, {}], got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.async_poll.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "async_poll.max_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Credentials required by the signed HTTP transport
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        match (&self.secret_id, &self.secret_key) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Ok(Credentials {
                secret_id: id.clone(),
                secret_key: key.clone(),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}
