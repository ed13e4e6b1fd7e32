//! Audit log entry types.

use chrono::{DateTime, Utc};
use pec_policy::EvaluationResult;
use pec_primitives::{ComplianceMetadata, ContextSummary, EntryId, SessionId};
use serde::{Deserialize, Serialize};

/// Kind of event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// Session bookkeeping after the tool set was filtered.
    AgentInitialisation,
    /// Tool admitted.
    ToolApproved,
    /// Tool rejected.
    ToolRejected,
    /// Admitted tool invoked.
    ToolInvocation,
    /// Invocation of a tool outside the admitted set refused.
    ToolInvocationBlocked,
    /// Tool admitted with warnings.
    ComplianceWarning,
}

impl AuditEventKind {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AgentInitialisation => "agent_initialisation",
            Self::ToolApproved => "tool_approved",
            Self::ToolRejected => "tool_rejected",
            Self::ToolInvocation => "tool_invocation",
            Self::ToolInvocationBlocked => "tool_invocation_blocked",
            Self::ComplianceWarning => "compliance_warning",
        }
    }
}

/// Immutable record of one audited event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    id: EntryId,
    timestamp: DateTime<Utc>,
    event_type: AuditEventKind,
    tool_name: Option<String>,
    context: ContextSummary,
    metadata: Option<ComplianceMetadata>,
    evaluation_result: Option<EvaluationResult>,
    #[serde(default)]
    reasoning: Vec<String>,
    session_id: SessionId,
}

impl AuditLogEntry {
    /// Creates a builder for a new entry.
    #[must_use]
    pub fn builder(
        kind: AuditEventKind,
        session_id: SessionId,
        context: ContextSummary,
    ) -> AuditLogEntryBuilder {
        AuditLogEntryBuilder {
            id: EntryId::random(),
            timestamp: Utc::now(),
            event_type: kind,
            tool_name: None,
            context,
            metadata: None,
            evaluation_result: None,
            reasoning: Vec::new(),
            session_id,
        }
    }

    /// Returns the unique identifier for this entry.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Returns when the entry was created.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the event kind.
    #[must_use]
    pub fn event_type(&self) -> AuditEventKind {
        self.event_type
    }

    /// Returns the tool name; `None` for session-level events.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Returns the context snapshot.
    #[must_use]
    pub fn context(&self) -> &ContextSummary {
        &self.context
    }

    /// Returns the evaluated metadata, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&ComplianceMetadata> {
        self.metadata.as_ref()
    }

    /// Returns the evaluation result, if any.
    #[must_use]
    pub fn evaluation_result(&self) -> Option<&EvaluationResult> {
        self.evaluation_result.as_ref()
    }

    /// Returns the reasoning trace.
    #[must_use]
    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    /// Returns the owning session.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

/// Builder type used to assemble [`AuditLogEntry`] instances.
#[derive(Debug)]
pub struct AuditLogEntryBuilder {
    id: EntryId,
    timestamp: DateTime<Utc>,
    event_type: AuditEventKind,
    tool_name: Option<String>,
    context: ContextSummary,
    metadata: Option<ComplianceMetadata>,
    evaluation_result: Option<EvaluationResult>,
    reasoning: Vec<String>,
    session_id: SessionId,
}

impl AuditLogEntryBuilder {
    /// Sets the tool name.
    #[must_use]
    pub fn tool(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    /// Attaches the evaluated metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: Option<ComplianceMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attaches the evaluation result.
    #[must_use]
    pub fn evaluation_result(mut self, result: EvaluationResult) -> Self {
        self.evaluation_result = Some(result);
        self
    }

    /// Replaces the reasoning trace.
    #[must_use]
    pub fn reasoning(mut self, reasoning: Vec<String>) -> Self {
        self.reasoning = reasoning;
        self
    }

    /// Finalises the entry.
    #[must_use]
    pub fn build(self) -> AuditLogEntry {
        AuditLogEntry {
            id: self.id,
            timestamp: self.timestamp,
            event_type: self.event_type,
            tool_name: self.tool_name,
            context: self.context,
            metadata: self.metadata,
            evaluation_result: self.evaluation_result,
            reasoning: self.reasoning,
            session_id: self.session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pec_primitives::RiskClassification;
    use serde_json::Value;

    fn summary() -> ContextSummary {
        ContextSummary {
            governing_law: "EU AI Act".into(),
            jurisdiction: "European Union".into(),
            max_risk_classification: RiskClassification::Limited,
        }
    }

    #[test]
    fn event_kinds_serialize_to_wire_labels() {
        for kind in [
            AuditEventKind::AgentInitialisation,
            AuditEventKind::ToolApproved,
            AuditEventKind::ToolRejected,
            AuditEventKind::ToolInvocation,
            AuditEventKind::ToolInvocationBlocked,
            AuditEventKind::ComplianceWarning,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn session_entries_serialize_null_tool_fields() {
        let session = SessionId::random();
        let entry = AuditLogEntry::builder(AuditEventKind::AgentInitialisation, session, summary())
            .reasoning(vec!["tools evaluated: 0".into()])
            .build();

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["eventType"], "agent_initialisation");
        assert_eq!(json["toolName"], Value::Null);
        assert_eq!(json["metadata"], Value::Null);
        assert_eq!(json["evaluationResult"], Value::Null);
        assert_eq!(json["context"]["governingLaw"], "EU AI Act");
        assert_eq!(json["sessionId"], session.to_string());
    }
}
