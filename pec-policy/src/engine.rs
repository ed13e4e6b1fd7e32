//! Compliance engine seam and the rule-based implementation.

use pec_primitives::{DeploymentContext, ToolRecord};
use tracing::debug;

use crate::decision::Evaluation;
use crate::rules::run_battery;

/// Trait implemented by compliance engines.
///
/// Evaluation is a pure function of its inputs: it never fails, and every
/// outcome is encoded in the returned [`Evaluation`].
pub trait ComplianceEngine: Send + Sync {
    /// Evaluates one tool against the deployment context.
    fn evaluate(&self, tool: &ToolRecord, context: &DeploymentContext) -> Evaluation;
}

/// Engine running the fixed rule battery.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    /// Creates the engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ComplianceEngine for RuleEngine {
    fn evaluate(&self, tool: &ToolRecord, context: &DeploymentContext) -> Evaluation {
        let evaluation = Evaluation::aggregate(run_battery(tool, context));
        for outcome in evaluation.outcomes().iter().filter(|o| o.is_fatal()) {
            debug!(
                tool = tool.name(),
                rule = %outcome.kind(),
                detail = outcome.detail(),
                "compliance rule failed"
            );
        }
        evaluation
    }
}

/// Evaluates one tool with the default [`RuleEngine`].
#[must_use]
pub fn evaluate(tool: &ToolRecord, context: &DeploymentContext) -> Evaluation {
    RuleEngine.evaluate(tool, context)
}
