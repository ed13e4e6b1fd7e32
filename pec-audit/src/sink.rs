//! Audit sinks receiving appended entries.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use pec_primitives::{DeploymentContext, SessionId};
use tracing::debug;

use crate::error::{AuditError, AuditResult};
use crate::log::AuditLog;
use crate::record::AuditLogEntry;

/// Trait implemented by audit sinks.
///
/// Appends for one session must be applied in call order without loss;
/// different sessions are independent.
pub trait AuditSink: Send + Sync {
    /// Appends an entry to the log of the session it names.
    ///
    /// # Errors
    ///
    /// Implementations return [`AuditError`] when the entry cannot be stored.
    fn append(&self, entry: AuditLogEntry) -> AuditResult<()>;
}

/// In-process store keeping one append-only log per session.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    sessions: RwLock<HashMap<SessionId, Mutex<AuditLog>>>,
}

impl MemoryAuditStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session for the context and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Serialization`] if the context cannot be
    /// fingerprinted, or [`AuditError::Poisoned`] on a poisoned lock.
    pub fn open_session(&self, context: &DeploymentContext) -> AuditResult<SessionId> {
        let session_id = SessionId::random();
        let log = AuditLog::new(session_id, context)?;
        let mut sessions = self.sessions.write().map_err(|_| AuditError::Poisoned)?;
        sessions.insert(session_id, Mutex::new(log));
        debug!(session = %session_id, "audit session opened");
        Ok(session_id)
    }

    /// Returns a copy of the session's log.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnknownSession`] for unknown sessions.
    pub fn snapshot(&self, session_id: SessionId) -> AuditResult<AuditLog> {
        let sessions = self.sessions.read().map_err(|_| AuditError::Poisoned)?;
        let log = sessions
            .get(&session_id)
            .ok_or(AuditError::UnknownSession(session_id))?;
        let guard = log.lock().map_err(|_| AuditError::Poisoned)?;
        Ok(guard.clone())
    }

    /// Renders the session's log as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnknownSession`] for unknown sessions or
    /// [`AuditError::Serialization`] on encoding failure.
    pub fn export_json(&self, session_id: SessionId) -> AuditResult<String> {
        self.snapshot(session_id)?.to_json_pretty()
    }

    /// Lists known sessions.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Poisoned`] on a poisoned lock.
    pub fn sessions(&self) -> AuditResult<Vec<SessionId>> {
        let sessions = self.sessions.read().map_err(|_| AuditError::Poisoned)?;
        let mut ids: Vec<_> = sessions.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

impl AuditSink for MemoryAuditStore {
    fn append(&self, entry: AuditLogEntry) -> AuditResult<()> {
        let sessions = self.sessions.read().map_err(|_| AuditError::Poisoned)?;
        let session_id = entry.session_id();
        let log = sessions
            .get(&session_id)
            .ok_or(AuditError::UnknownSession(session_id))?;
        let mut guard = log.lock().map_err(|_| AuditError::Poisoned)?;
        guard.append(entry)
    }
}
