//! Per-session, append-only audit log.

use chrono::{DateTime, Utc};
use pec_primitives::{DeploymentContext, SessionId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AuditError, AuditResult};
use crate::record::AuditLogEntry;

/// Computes the lowercase hex SHA-256 of the context's canonical JSON form.
///
/// # Errors
///
/// Returns [`AuditError::Serialization`] if the context cannot be encoded.
pub fn context_fingerprint(context: &DeploymentContext) -> AuditResult<String> {
    let canonical = serde_json::to_vec(context)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Ordered audit entries for one deployment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    session_id: SessionId,
    start_time: DateTime<Utc>,
    context_hash: String,
    #[serde(default)]
    entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    /// Starts an empty log for the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Serialization`] if the context cannot be fingerprinted.
    pub fn new(session_id: SessionId, context: &DeploymentContext) -> AuditResult<Self> {
        Ok(Self {
            session_id,
            start_time: Utc::now(),
            context_hash: context_fingerprint(context)?,
            entries: Vec::new(),
        })
    }

    /// Appends an entry owned by this session.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::SessionMismatch`] when the entry belongs to another session.
    pub fn append(&mut self, entry: AuditLogEntry) -> AuditResult<()> {
        if entry.session_id() != self.session_id {
            return Err(AuditError::SessionMismatch {
                entry: entry.session_id(),
                log: self.session_id,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the owning session.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns when the session started.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the deployment context fingerprint.
    #[must_use]
    pub fn context_hash(&self) -> &str {
        &self.context_hash
    }

    /// Returns entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    /// Renders the log as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Serialization`] on encoding failure.
    pub fn to_json_pretty(&self) -> AuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
