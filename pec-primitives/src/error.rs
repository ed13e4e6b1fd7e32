//! Shared error definitions for PEC primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the gating runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided session or entry identifier could not be parsed.
    #[error("invalid identifier: {source}")]
    InvalidId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// A string did not name any member of a closed enumeration.
    #[error("unknown {kind} `{value}`")]
    UnknownVariant {
        /// Enumeration being parsed (e.g. `risk classification`).
        kind: &'static str,
        /// The offending input.
        value: String,
    },

    /// Deployment context failed validation.
    #[error("invalid deployment context: {reason}")]
    InvalidContext {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Compliance metadata failed validation.
    #[error("invalid compliance metadata: {reason}")]
    InvalidMetadata {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Tool record failed validation.
    #[error("invalid tool record: {reason}")]
    InvalidTool {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Document could not be decoded.
    #[error("malformed document: {source}")]
    Malformed {
        /// Source decoding error.
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn invalid_context(reason: impl Into<String>) -> Self {
        Self::InvalidContext {
            reason: reason.into(),
        }
    }
}
