//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    NumberParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A duration setting was zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    /// Probe concurrency was zero.
    #[error("probe concurrency must be at least 1")]
    ZeroConcurrency,

    /// The file size limit does not admit any valid file.
    #[error("max file size {max_bytes} is below the {min_bytes}-byte minimum valid file")]
    FileLimitTooSmall { max_bytes: usize, min_bytes: usize },

    /// A service URL is not http(s).
    #[error("invalid {name} '{value}': expected an http(s) URL")]
    InvalidUrl { name: &'static str, value: String },
}
