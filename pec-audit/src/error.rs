//! Error types for the audit subsystem.

use pec_primitives::SessionId;
use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted by audit components.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Entry targeted a session the sink does not know.
    #[error("unknown audit session {0}")]
    UnknownSession(SessionId),
    /// Entry was appended to a log owned by another session.
    #[error("entry for session {entry} cannot be appended to session {log}")]
    SessionMismatch {
        /// Session recorded on the entry.
        entry: SessionId,
        /// Session owning the log.
        log: SessionId,
    },
    /// Serialization or deserialization error.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
    /// A lock guarding audit state was poisoned by a panicking writer.
    #[error("audit store lock poisoned")]
    Poisoned,
}

/// Result type alias for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
