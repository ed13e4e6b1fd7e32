//! Gate for invocation requests against the admitted tool set.

use pec_audit::AuditRecorder;
use pec_primitives::ToolRecord;
use tracing::warn;

use crate::error::GuardError;
use crate::filter::FilterOutcome;

/// Authorises invocations of admitted tools and audits every request.
#[derive(Debug)]
pub struct InvocationGuard<'a> {
    outcome: &'a FilterOutcome,
    recorder: AuditRecorder<'a>,
}

impl<'a> InvocationGuard<'a> {
    /// Binds a guard to a filtering outcome and the session recorder.
    #[must_use]
    pub fn new(outcome: &'a FilterOutcome, recorder: AuditRecorder<'a>) -> Self {
        Self { outcome, recorder }
    }

    /// Authorises an invocation by tool name.
    ///
    /// Admitted tools yield a `tool_invocation` entry; legacy tools only when the
    /// context asks for legacy invocations to be logged. Anything else yields a
    /// `tool_invocation_blocked` entry.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Blocked`] for rejected or unknown tools and
    /// [`GuardError::Audit`] when the entry cannot be recorded.
    pub fn authorize(&self, name: &str) -> Result<&'a ToolRecord, GuardError> {
        if let Some(tool) = self.outcome.admitted_tool(name) {
            let log_legacy = self.recorder.context().legacy_servers.log_invocations;
            if !tool.is_legacy() || log_legacy {
                self.recorder.record_invocation(tool)?;
            }
            return Ok(tool);
        }

        let reason = match self.outcome.rejection(name) {
            Some(result) => format!("tool was rejected: {}", result.reasons().join("; ")),
            None => "tool is not in the admitted set".to_owned(),
        };
        warn!(tool = name, %reason, "tool invocation blocked");
        self.recorder.record_blocked_invocation(name, &reason)?;
        Err(GuardError::Blocked {
            name: name.to_owned(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ToolFilter;
    use pec_audit::{AuditEventKind, MemoryAuditStore};
    use pec_primitives::{ComplianceMetadata, DeploymentContext, LegacyPolicy, RiskClassification};

    fn context(log_invocations: bool) -> DeploymentContext {
        DeploymentContext::builder("EU AI Act", "European Union", RiskClassification::Limited)
            .require_locations(["EU"])
            .legacy_servers(LegacyPolicy::Allow, log_invocations)
            .build()
            .unwrap()
    }

    fn tools() -> Vec<ToolRecord> {
        let ok = ComplianceMetadata::builder(RiskClassification::Minimal)
            .locations(["DE"])
            .conformity_assessed(true)
            .build()
            .unwrap();
        let risky = ComplianceMetadata::builder(RiskClassification::High)
            .locations(["DE"])
            .conformity_assessed(true)
            .build()
            .unwrap();
        vec![
            ToolRecord::new("translate", ok).unwrap(),
            ToolRecord::new("profiler", risky).unwrap(),
            ToolRecord::legacy("weather").unwrap(),
        ]
    }

    fn invocation_kinds(
        store: &MemoryAuditStore,
        session: pec_primitives::SessionId,
    ) -> Vec<AuditEventKind> {
        store
            .snapshot(session)
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.event_type())
            .filter(|k| {
                matches!(
                    k,
                    AuditEventKind::ToolInvocation | AuditEventKind::ToolInvocationBlocked
                )
            })
            .collect()
    }

    #[test]
    fn admitted_tools_are_authorised_and_logged() {
        let ctx = context(true);
        let store = MemoryAuditStore::new();
        let session = store.open_session(&ctx).unwrap();
        let recorder = AuditRecorder::new(&store, session, &ctx);
        let outcome = ToolFilter::new().filter(tools(), &recorder).unwrap();
        let guard = InvocationGuard::new(&outcome, recorder);

        assert_eq!(guard.authorize("translate").unwrap().name(), "translate");
        assert_eq!(guard.authorize("weather").unwrap().name(), "weather");
        assert_eq!(
            invocation_kinds(&store, session),
            [AuditEventKind::ToolInvocation, AuditEventKind::ToolInvocation]
        );
    }

    #[test]
    fn legacy_invocations_can_go_unlogged() {
        let ctx = context(false);
        let store = MemoryAuditStore::new();
        let session = store.open_session(&ctx).unwrap();
        let recorder = AuditRecorder::new(&store, session, &ctx);
        let outcome = ToolFilter::new().filter(tools(), &recorder).unwrap();
        let guard = InvocationGuard::new(&outcome, recorder);

        guard.authorize("weather").unwrap();
        assert!(invocation_kinds(&store, session).is_empty());
    }

    #[test]
    fn rejected_and_unknown_tools_are_blocked() {
        let ctx = context(true);
        let store = MemoryAuditStore::new();
        let session = store.open_session(&ctx).unwrap();
        let recorder = AuditRecorder::new(&store, session, &ctx);
        let outcome = ToolFilter::new().filter(tools(), &recorder).unwrap();
        let guard = InvocationGuard::new(&outcome, recorder);

        let err = guard.authorize("profiler").unwrap_err();
        assert!(matches!(
            &err,
            GuardError::Blocked { reason, .. } if reason.contains("exceeds maximum permitted")
        ));
        let err = guard.authorize("shell").unwrap_err();
        assert!(matches!(&err, GuardError::Blocked { name, .. } if name == "shell"));
        assert_eq!(
            invocation_kinds(&store, session),
            [
                AuditEventKind::ToolInvocationBlocked,
                AuditEventKind::ToolInvocationBlocked
            ]
        );
    }
}
