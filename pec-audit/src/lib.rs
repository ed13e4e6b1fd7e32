//! Audit trail for PEC tool decisions.
//!
//! Every evaluation is rendered into an immutable [`AuditLogEntry`] carrying a
//! per-rule reasoning trace and appended to a session's [`AuditLog`] through
//! an injected [`AuditSink`].

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod log;
pub mod record;
pub mod recorder;
pub mod sink;
pub mod trace;

pub use error::{AuditError, AuditResult};
pub use log::{AuditLog, context_fingerprint};
pub use record::{AuditEventKind, AuditLogEntry, AuditLogEntryBuilder};
pub use recorder::AuditRecorder;
pub use sink::{AuditSink, MemoryAuditStore};
pub use trace::{SessionTotals, TraceBuilder};
