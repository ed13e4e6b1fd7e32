//! Session-bound recorder turning decisions into audit entries.

use pec_policy::Evaluation;
use pec_primitives::{ContextSummary, DeploymentContext, EntryId, SessionId, ToolRecord};
use tracing::trace;

use crate::error::AuditResult;
use crate::record::{AuditEventKind, AuditLogEntry, AuditLogEntryBuilder};
use crate::sink::AuditSink;
use crate::trace::{SessionTotals, TraceBuilder};

/// Records audit entries for one session into an injected sink.
#[derive(Clone, Copy)]
pub struct AuditRecorder<'a> {
    sink: &'a dyn AuditSink,
    session_id: SessionId,
    context: &'a DeploymentContext,
}

impl std::fmt::Debug for AuditRecorder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("session_id", &self.session_id)
            .field("jurisdiction", &self.context.jurisdiction)
            .finish_non_exhaustive()
    }
}

impl<'a> AuditRecorder<'a> {
    /// Binds a recorder to a sink, session and context.
    #[must_use]
    pub fn new(
        sink: &'a dyn AuditSink,
        session_id: SessionId,
        context: &'a DeploymentContext,
    ) -> Self {
        Self {
            sink,
            session_id,
            context,
        }
    }

    /// Returns the session entries are recorded under.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the governing context.
    #[must_use]
    pub fn context(&self) -> &'a DeploymentContext {
        self.context
    }

    fn summary(&self) -> ContextSummary {
        self.context.summary()
    }

    fn entry(&self, kind: AuditEventKind) -> AuditLogEntryBuilder {
        AuditLogEntry::builder(kind, self.session_id, self.summary())
    }

    fn commit(&self, entry: AuditLogEntry) -> AuditResult<EntryId> {
        let id = entry.id();
        trace!(
            session = %self.session_id,
            entry = %id,
            kind = entry.event_type().as_str(),
            "audit entry appended"
        );
        self.sink.append(entry)?;
        Ok(id)
    }

    /// Records the session bookkeeping entry with totals.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn record_initialisation(&self, totals: SessionTotals) -> AuditResult<EntryId> {
        let reasoning = TraceBuilder::new(self.context).initialisation(totals);
        self.commit(
            self.entry(AuditEventKind::AgentInitialisation)
                .reasoning(reasoning)
                .build(),
        )
    }

    /// Records an approval or rejection with the full per-rule trace.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn record_evaluation(
        &self,
        tool: &ToolRecord,
        evaluation: &Evaluation,
    ) -> AuditResult<EntryId> {
        let kind = if evaluation.result().is_compliant() {
            AuditEventKind::ToolApproved
        } else {
            AuditEventKind::ToolRejected
        };
        let reasoning = TraceBuilder::new(self.context).evaluation(tool, evaluation);
        self.commit(
            self.entry(kind)
                .tool(tool.name())
                .metadata(tool.compliance().cloned())
                .evaluation_result(evaluation.result().clone())
                .reasoning(reasoning)
                .build(),
        )
    }

    /// Records the warnings of an admitted tool.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn record_warning(
        &self,
        tool: &ToolRecord,
        evaluation: &Evaluation,
    ) -> AuditResult<EntryId> {
        let reasoning = evaluation
            .result()
            .warnings()
            .iter()
            .map(|warning| format!("warning: {warning}"))
            .collect();
        self.commit(
            self.entry(AuditEventKind::ComplianceWarning)
                .tool(tool.name())
                .metadata(tool.compliance().cloned())
                .evaluation_result(evaluation.result().clone())
                .reasoning(reasoning)
                .build(),
        )
    }

    /// Records an invocation of an admitted tool.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn record_invocation(&self, tool: &ToolRecord) -> AuditResult<EntryId> {
        let provenance = if tool.is_legacy() {
            "legacy tool without compliance metadata"
        } else {
            "tool admitted under compliance metadata"
        };
        self.commit(
            self.entry(AuditEventKind::ToolInvocation)
                .tool(tool.name())
                .metadata(tool.compliance().cloned())
                .reasoning(vec![format!("invocation permitted: {provenance}")])
                .build(),
        )
    }

    /// Records a refused invocation.
    ///
    /// # Errors
    ///
    /// Propagates sink failures.
    pub fn record_blocked_invocation(&self, tool_name: &str, reason: &str) -> AuditResult<EntryId> {
        self.commit(
            self.entry(AuditEventKind::ToolInvocationBlocked)
                .tool(tool_name)
                .reasoning(vec![format!("invocation blocked: {reason}")])
                .build(),
        )
    }
}
