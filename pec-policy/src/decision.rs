//! Aggregation of rule outcomes into a single decision.

use serde::{Deserialize, Serialize};

use crate::rules::{RuleKind, RuleOutcome, Verdict};

const ESCALATION_PREFIX: &str = "escalation required: ";

/// Admit/reject decision for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    compliant: bool,
    #[serde(default)]
    reasons: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

impl EvaluationResult {
    /// Collects reasons and warnings in rule order.
    #[must_use]
    pub fn from_outcomes(outcomes: &[RuleOutcome]) -> Self {
        let mut reasons = Vec::new();
        let mut warnings = Vec::new();
        for outcome in outcomes {
            match outcome.verdict() {
                Verdict::Pass => {}
                Verdict::Fail => reasons.push(outcome.detail().to_owned()),
                Verdict::Warn => warnings.push(outcome.detail().to_owned()),
                Verdict::Escalate => {
                    warnings.push(format!("{ESCALATION_PREFIX}{}", outcome.detail()));
                }
            }
        }

        Self {
            compliant: reasons.is_empty(),
            reasons,
            warnings,
        }
    }

    /// Returns `true` when no fatal reason was recorded.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.compliant
    }

    /// Returns fatal reasons in rule order.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Returns warnings in rule order.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Structured outcomes of one evaluation together with the derived decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    outcomes: Vec<RuleOutcome>,
    result: EvaluationResult,
}

impl Evaluation {
    /// Combines outcomes into a decision.
    #[must_use]
    pub fn aggregate(outcomes: Vec<RuleOutcome>) -> Self {
        let result = EvaluationResult::from_outcomes(&outcomes);
        Self { outcomes, result }
    }

    /// Returns every outcome in rule order.
    #[must_use]
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Returns outcomes belonging to one category.
    pub fn outcomes_for(&self, kind: RuleKind) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(move |o| o.kind() == kind)
    }

    /// Returns the worst verdict recorded for a category, if it was evaluated.
    #[must_use]
    pub fn verdict_for(&self, kind: RuleKind) -> Option<Verdict> {
        self.outcomes_for(kind)
            .map(RuleOutcome::verdict)
            .max_by_key(|v| v.severity())
    }

    /// Returns the decision.
    #[must_use]
    pub fn result(&self) -> &EvaluationResult {
        &self.result
    }

    /// Consumes the evaluation, returning the decision.
    #[must_use]
    pub fn into_result(self) -> EvaluationResult {
        self.result
    }
}
