//! Errors raised while loading deployment contexts.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a deployment context.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read context file {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// JSON document could not be decoded.
    #[error("context JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML document could not be decoded.
    #[error("context TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// File extension is neither `.json` nor `.toml`.
    #[error("unsupported context format for {path}; expected .json or .toml")]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },
    /// Decoded context failed validation.
    #[error("invalid context: {0}")]
    Invalid(#[from] pec_primitives::Error),
    /// No explicit path and the environment variable is unset.
    #[error("environment variable {var} is not set")]
    MissingEnv {
        /// Variable name.
        var: &'static str,
    },
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
