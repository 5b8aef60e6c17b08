//! Client configuration.
//!
//! Defaults point at a locally running movie service. Any field can be
//! overridden from a JSON document or from `REELSYNC_*` environment
//! variables:
//!
//! | variable                 | field          |
//! |--------------------------|----------------|
//! | `REELSYNC_API_URL`       | `base_url`     |
//! | `REELSYNC_TIMEOUT_MS`    | `timeout_ms`   |
//! | `REELSYNC_GUARD_POLICY`  | `guard_policy` |
//! | `REELSYNC_STORAGE_PATH`  | `storage_path` |

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::lock::GuardPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8800/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const ENV_API_URL: &str = "REELSYNC_API_URL";
const ENV_TIMEOUT_MS: &str = "REELSYNC_TIMEOUT_MS";
const ENV_GUARD_POLICY: &str = "REELSYNC_GUARD_POLICY";
const ENV_STORAGE_PATH: &str = "REELSYNC_STORAGE_PATH";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the movie service, without trailing slash.
    pub base_url: String,
    /// Per-request timeout. A request that exceeds it counts as unreachable.
    pub timeout_ms: u64,
    /// Behavior for a second mutation on an entity that is still pending.
    pub guard_policy: GuardPolicy,
    /// Where the durable store lives. `None` keeps everything in memory.
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            guard_policy: GuardPolicy::default(),
            storage_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Defaults overridden by `REELSYNC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let base_url = config.base_url.clone();
        Ok(config.with_base_url(base_url))
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_MS,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(raw) = lookup(ENV_GUARD_POLICY) {
            config.guard_policy = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_GUARD_POLICY,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            if !path.trim().is_empty() {
                config.storage_path = Some(PathBuf::from(path));
            }
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_guard_policy(mut self, policy: GuardPolicy) -> Self {
        self.guard_policy = policy;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
