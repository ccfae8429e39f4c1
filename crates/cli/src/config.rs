// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State directory configuration.
//!
//! Configuration is stored in `<state_dir>/config.toml` and includes:
//! - `[remote]`: REST endpoint, token source and request timeout
//! - `[retry]`: backoff schedule for failed remote calls
//! - `[storage]`: which backend persists the queue and conflicts

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::RetryConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "resync";

/// Configuration stored in `<state_dir>/config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint (absent: local queueing only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// REST remote configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL; collections are addressed below it (`{url}/tasks/{id}`).
    pub url: String,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token_env() -> String {
    env::vars::RESYNC_TOKEN.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl RemoteConfig {
    /// Remote at `url` with default token source and timeout.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Bearer token from the configured environment variable, if set.
    pub fn token(&self) -> Option<String> {
        env::secret(&self.token_env)
    }
}

/// Backoff schedule, in the units written to `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first attempt (default: 3).
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Delay before the first retry in milliseconds (default: 1000).
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Growth factor between retries (default: 2.0).
    #[serde(default = "default_retry_delay_multiplier")]
    pub retry_delay_multiplier: f64,
    /// Cap on a single delay in milliseconds (default: 30000).
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    /// Random perturbation fraction, 0 to 1 (default: 0.1).
    #[serde(default = "default_retry_delay_jitter")]
    pub retry_delay_jitter: f64,
    /// Also retry 4xx responses other than 401 (default: false).
    #[serde(default)]
    pub retry_on_4xx: bool,
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_retry_delay_multiplier() -> f64 {
    2.0
}

fn default_max_retry_delay_ms() -> u64 {
    30_000
}

fn default_retry_delay_jitter() -> f64 {
    0.1
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            retry_delay_multiplier: default_retry_delay_multiplier(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            retry_delay_jitter: default_retry_delay_jitter(),
            retry_on_4xx: false,
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            retry_delay_multiplier: self.retry_delay_multiplier,
            max_retry_delay: Duration::from_millis(self.max_retry_delay_ms),
            retry_delay_jitter: self.retry_delay_jitter,
            retry_on_4xx: self.retry_on_4xx,
        }
    }
}

/// Persistence backend for the queue and conflict records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON record per line, rewritten atomically.
    #[default]
    Jsonl,
    /// A single SQLite database file.
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
}

impl Config {
    /// Loads and validates configuration from the given state directory.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(Error::NotInitialized(state_dir.display().to_string()));
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let retry = &self.retry;
        if !retry.retry_delay_multiplier.is_finite() || retry.retry_delay_multiplier < 1.0 {
            return Err(Error::Config(format!(
                "retry_delay_multiplier must be at least 1.0, got {}",
                retry.retry_delay_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&retry.retry_delay_jitter) {
            return Err(Error::Config(format!(
                "retry_delay_jitter must be between 0 and 1, got {}",
                retry.retry_delay_jitter
            )));
        }
        if retry.max_retry_delay_ms < retry.retry_delay_ms {
            return Err(Error::Config(format!(
                "max_retry_delay_ms ({}) is below retry_delay_ms ({})",
                retry.max_retry_delay_ms, retry.retry_delay_ms
            )));
        }

        if let Some(remote) = &self.remote {
            if !(remote.url.starts_with("http://") || remote.url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "invalid remote url '{}': must be http:// or https://",
                    remote.url
                )));
            }
            if remote.timeout_secs == 0 {
                return Err(Error::Config("timeout_secs must be positive".to_string()));
            }
        }
        Ok(())
    }
}

/// Resolve the state directory: explicit flag, then `RESYNC_STATE_DIR`, then
/// the platform data directory.
pub fn resolve_state_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    state_dir_from(flag, env::state_dir(), dirs::data_local_dir())
}

pub(crate) fn state_dir_from(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    flag.or(env_dir)
        .or_else(|| data_dir.map(|d| d.join(APP_DIR_NAME)))
        .ok_or_else(|| {
            Error::Config(
                "cannot determine a state directory\n  hint: pass --state-dir or set RESYNC_STATE_DIR"
                    .to_string(),
            )
        })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
