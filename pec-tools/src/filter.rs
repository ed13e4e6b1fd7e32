//! Partitioning of candidate tools into admitted and rejected sets.

use std::num::NonZeroUsize;
use std::thread;

use pec_audit::{AuditRecorder, AuditResult, SessionTotals};
use pec_policy::{ComplianceEngine, Evaluation, EvaluationResult, RuleEngine};
use pec_primitives::ToolRecord;
use pec_telemetry::{evaluation_span, session_span};
use tracing::{info, warn};

/// Admitted and rejected tools, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    admitted: Vec<ToolRecord>,
    rejected: Vec<(ToolRecord, EvaluationResult)>,
}

impl FilterOutcome {
    /// Returns admitted tools.
    #[must_use]
    pub fn admitted(&self) -> &[ToolRecord] {
        &self.admitted
    }

    /// Returns rejected tools with their decisions.
    #[must_use]
    pub fn rejected(&self) -> &[(ToolRecord, EvaluationResult)] {
        &self.rejected
    }

    /// Returns the admitted tool with the given name.
    #[must_use]
    pub fn admitted_tool(&self, name: &str) -> Option<&ToolRecord> {
        self.admitted.iter().find(|tool| tool.name() == name)
    }

    /// Returns the decision that rejected the named tool.
    #[must_use]
    pub fn rejection(&self, name: &str) -> Option<&EvaluationResult> {
        self.rejected
            .iter()
            .find(|(tool, _)| tool.name() == name)
            .map(|(_, result)| result)
    }

    /// Returns evaluation totals for the session initialisation entry.
    #[must_use]
    pub fn totals(&self) -> SessionTotals {
        SessionTotals {
            evaluated: self.admitted.len() + self.rejected.len(),
            approved: self.admitted.len(),
            rejected: self.rejected.len(),
        }
    }
}

/// Runs a compliance engine over a batch of tools and audits every decision.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter<E = RuleEngine> {
    engine: E,
}

impl ToolFilter {
    /// Creates a filter backed by the default rule engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ComplianceEngine> ToolFilter<E> {
    /// Creates a filter backed by a custom engine.
    #[must_use]
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Evaluates tools in order against the recorder's context.
    ///
    /// One evaluation entry is recorded per tool, plus a warning entry for tools
    /// admitted with warnings.
    ///
    /// # Errors
    ///
    /// Propagates audit sink failures; evaluation itself cannot fail.
    pub fn filter<I>(&self, tools: I, recorder: &AuditRecorder<'_>) -> AuditResult<FilterOutcome>
    where
        I: IntoIterator<Item = ToolRecord>,
    {
        let session = session_span(recorder.session_id(), &recorder.context().jurisdiction);
        let _session = session.enter();
        let mut outcome = FilterOutcome::default();
        for tool in tools {
            let span = evaluation_span(tool.name(), recorder.session_id());
            let _entered = span.enter();
            let evaluation = self.engine.evaluate(&tool, recorder.context());
            route(&mut outcome, tool, evaluation, recorder)?;
        }
        Ok(outcome)
    }

    /// Evaluates tools on up to `workers` scoped threads, then records and
    /// routes them sequentially in input order.
    ///
    /// # Errors
    ///
    /// Propagates audit sink failures.
    pub fn filter_parallel(
        &self,
        tools: Vec<ToolRecord>,
        recorder: &AuditRecorder<'_>,
        workers: NonZeroUsize,
    ) -> AuditResult<FilterOutcome> {
        let context = recorder.context();
        let session = session_span(recorder.session_id(), &context.jurisdiction);
        let _session = session.enter();
        let chunk = tools.len().div_ceil(workers.get()).max(1);
        let evaluations: Vec<Evaluation> = thread::scope(|scope| {
            let handles: Vec<_> = tools
                .chunks(chunk)
                .map(|slice| {
                    scope.spawn(move || {
                        slice
                            .iter()
                            .map(|tool| self.engine.evaluate(tool, context))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        let mut outcome = FilterOutcome::default();
        for (tool, evaluation) in tools.into_iter().zip(evaluations) {
            let span = evaluation_span(tool.name(), recorder.session_id());
            let _entered = span.enter();
            route(&mut outcome, tool, evaluation, recorder)?;
        }
        Ok(outcome)
    }
}

fn route(
    outcome: &mut FilterOutcome,
    tool: ToolRecord,
    evaluation: Evaluation,
    recorder: &AuditRecorder<'_>,
) -> AuditResult<()> {
    recorder.record_evaluation(&tool, &evaluation)?;
    let result = evaluation.result();

    if result.is_compliant() {
        if !result.warnings().is_empty() {
            recorder.record_warning(&tool, &evaluation)?;
        }
        if tool.is_legacy() {
            warn!(tool = tool.name(), "admitting tool without compliance metadata");
        }
        info!(
            tool = tool.name(),
            warnings = result.warnings().len(),
            "tool admitted"
        );
        outcome.admitted.push(tool);
    } else {
        info!(
            tool = tool.name(),
            reasons = result.reasons().len(),
            "tool rejected"
        );
        outcome.rejected.push((tool, evaluation.into_result()));
    }
    Ok(())
}
