//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SIFT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    CACHE_READ_TIMEOUT_MS, DEFAULT_MAX_FILE_BYTES, DEFAULT_PROBE_CONCURRENCY, GATEWAY_TIMEOUT_MS,
    MIN_FILE_BYTES, RESULT_TTL_SECS, TASK_TTL_SECS,
};

/// Default parse-service URL used when `SIFT_GATEWAY_URL` is not set.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9100";

/// Default similarity-service URL used when `SIFT_SIMILARITY_URL` is not set.
pub const DEFAULT_SIMILARITY_URL: &str = "http://localhost:9200";

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIFT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// How long a cached parse result stays valid. Default: 24 hours.
    pub result_ttl_secs: u64,

    /// How long a batch task record stays pollable. Default: 2 hours.
    pub task_ttl_secs: u64,

    /// Bounded wait for a single cache read. Default: `3000` ms.
    pub cache_read_timeout_ms: u64,

    /// HTTP timeout for gateway calls. Default: `30000` ms.
    pub gateway_timeout_ms: u64,

    /// Concurrent cache probes during a batch. Default: `8`.
    pub probe_concurrency: usize,

    /// Upload size ceiling in bytes. Default: 10 MiB.
    pub max_file_bytes: usize,

    /// Parse-service base URL.
    pub gateway_url: String,

    /// Similarity-service base URL.
    pub similarity_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            result_ttl_secs: RESULT_TTL_SECS,
            task_ttl_secs: TASK_TTL_SECS,
            cache_read_timeout_ms: CACHE_READ_TIMEOUT_MS,
            gateway_timeout_ms: GATEWAY_TIMEOUT_MS,
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            similarity_url: DEFAULT_SIMILARITY_URL.to_string(),
        }
    }
}

impl Config {
    const ENV_RESULT_TTL: &'static str = "SIFT_RESULT_TTL_SECS";
    const ENV_TASK_TTL: &'static str = "SIFT_TASK_TTL_SECS";
    const ENV_CACHE_READ_TIMEOUT: &'static str = "SIFT_CACHE_READ_TIMEOUT_MS";
    const ENV_GATEWAY_TIMEOUT: &'static str = "SIFT_GATEWAY_TIMEOUT_MS";
    const ENV_PROBE_CONCURRENCY: &'static str = "SIFT_PROBE_CONCURRENCY";
    const ENV_MAX_FILE_BYTES: &'static str = "SIFT_MAX_FILE_BYTES";
    const ENV_GATEWAY_URL: &'static str = "SIFT_GATEWAY_URL";
    const ENV_SIMILARITY_URL: &'static str = "SIFT_SIMILARITY_URL";

    /// Loads configuration from environment variables (falling back to
    /// defaults). Malformed numbers are errors, not silent defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            result_ttl_secs: Self::parse_u64_from_env(
                Self::ENV_RESULT_TTL,
                defaults.result_ttl_secs,
            )?,
            task_ttl_secs: Self::parse_u64_from_env(Self::ENV_TASK_TTL, defaults.task_ttl_secs)?,
            cache_read_timeout_ms: Self::parse_u64_from_env(
                Self::ENV_CACHE_READ_TIMEOUT,
                defaults.cache_read_timeout_ms,
            )?,
            gateway_timeout_ms: Self::parse_u64_from_env(
                Self::ENV_GATEWAY_TIMEOUT,
                defaults.gateway_timeout_ms,
            )?,
            probe_concurrency: Self::parse_usize_from_env(
                Self::ENV_PROBE_CONCURRENCY,
                defaults.probe_concurrency,
            )?,
            max_file_bytes: Self::parse_usize_from_env(
                Self::ENV_MAX_FILE_BYTES,
                defaults.max_file_bytes,
            )?,
            gateway_url: Self::parse_string_from_env(Self::ENV_GATEWAY_URL, defaults.gateway_url),
            similarity_url: Self::parse_string_from_env(
                Self::ENV_SIMILARITY_URL,
                defaults.similarity_url,
            ),
        })
    }

    /// Checks basic invariants after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_ttl_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                name: Self::ENV_RESULT_TTL,
            });
        }
        if self.task_ttl_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                name: Self::ENV_TASK_TTL,
            });
        }
        if self.cache_read_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: Self::ENV_CACHE_READ_TIMEOUT,
            });
        }
        if self.probe_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.max_file_bytes < MIN_FILE_BYTES {
            return Err(ConfigError::FileLimitTooSmall {
                max_bytes: self.max_file_bytes,
                min_bytes: MIN_FILE_BYTES,
            });
        }
        Self::validate_url(Self::ENV_GATEWAY_URL, &self.gateway_url)?;
        Self::validate_url(Self::ENV_SIMILARITY_URL, &self.similarity_url)?;
        Ok(())
    }

    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }

    pub fn task_ttl(&self) -> Duration {
        Duration::from_secs(self.task_ttl_secs)
    }

    pub fn cache_read_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_read_timeout_ms)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidUrl {
                name,
                value: value.to_string(),
            })
        }
    }

    fn parse_u64_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::NumberParseError {
                name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::NumberParseError {
                name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(name: &'static str, default: String) -> String {
        env::var(name).unwrap_or(default)
    }
}
