//! Errors produced by tool cataloguing and gating.

use pec_audit::AuditError;
use thiserror::Error;

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors produced by catalog registration.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Tool name collided with an existing registration.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },
}

/// Errors produced when an invocation is gated.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Tool is not in the admitted set.
    #[error("invocation of `{name}` blocked: {reason}")]
    Blocked {
        /// Name of the requested tool.
        name: String,
        /// Why the invocation was refused.
        reason: String,
    },
    /// Audit sink refused the entry.
    #[error(transparent)]
    Audit(#[from] AuditError),
}
