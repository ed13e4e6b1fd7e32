//! Human-readable reasoning traces for audit entries.

use std::collections::BTreeSet;
use std::fmt::Display;

use pec_policy::{Evaluation, RuleKind, Verdict};
use pec_primitives::{ComplianceMetadata, DeploymentContext, ToolRecord};

/// Sections rendered for tools that declare metadata, in order.
const SECTIONS: [RuleKind; 8] = [
    RuleKind::Location,
    RuleKind::Risk,
    RuleKind::Conformity,
    RuleKind::TransferMechanism,
    RuleKind::SpecialCategory,
    RuleKind::Certification,
    RuleKind::Sector,
    RuleKind::SupplyChain,
];

/// Totals summarised in the session initialisation entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTotals {
    /// Tools evaluated.
    pub evaluated: usize,
    /// Tools admitted.
    pub approved: usize,
    /// Tools rejected.
    pub rejected: usize,
}

/// Renders deterministic reasoning traces from structured rule outcomes.
#[derive(Debug, Clone, Copy)]
pub struct TraceBuilder<'a> {
    context: &'a DeploymentContext,
}

impl<'a> TraceBuilder<'a> {
    /// Creates a builder for traces under the given context.
    #[must_use]
    pub fn new(context: &'a DeploymentContext) -> Self {
        Self { context }
    }

    /// Renders the per-rule trace for one evaluation.
    #[must_use]
    pub fn evaluation(&self, tool: &ToolRecord, evaluation: &Evaluation) -> Vec<String> {
        let mut lines = vec![format!(
            "Evaluating tool `{}` under {} ({})",
            tool.name(),
            self.context.governing_law,
            self.context.jurisdiction
        )];

        match tool.compliance() {
            Some(metadata) => {
                self.section(&mut lines, RuleKind::Presence, evaluation, |lines| {
                    lines.push(format!(
                        "schema version: {}",
                        metadata.version.as_deref().unwrap_or("none")
                    ));
                });
                for kind in SECTIONS {
                    self.section(&mut lines, kind, evaluation, |lines| {
                        self.declared(lines, kind, metadata);
                    });
                }
            }
            None => {
                self.section(&mut lines, RuleKind::Presence, evaluation, |lines| {
                    lines.push("compliance metadata: absent".to_owned());
                    lines.push(format!(
                        "legacy server policy: {}",
                        self.context.legacy_servers.policy
                    ));
                });
            }
        }

        let result = evaluation.result();
        lines.push("[Final decision]".to_owned());
        lines.push(format!("compliant: {}", result.is_compliant()));
        lines.push(format!("reasons: {}", join_or_none(result.reasons())));
        lines.push(format!("warnings: {}", join_or_none(result.warnings())));
        lines
    }

    /// Renders the fixed trace of a session initialisation entry.
    #[must_use]
    pub fn initialisation(&self, totals: SessionTotals) -> Vec<String> {
        vec![
            format!(
                "Session initialised under {} ({})",
                self.context.governing_law, self.context.jurisdiction
            ),
            format!(
                "maximum risk permitted: {}",
                self.context.risk_classification.maximum_permitted
            ),
            format!("tools evaluated: {}", totals.evaluated),
            format!("tools approved: {}", totals.approved),
            format!("tools rejected: {}", totals.rejected),
        ]
    }

    fn section(
        &self,
        lines: &mut Vec<String>,
        kind: RuleKind,
        evaluation: &Evaluation,
        body: impl FnOnce(&mut Vec<String>),
    ) {
        lines.push(format!("[{}]", kind.label()));
        body(lines);
        for outcome in evaluation.outcomes_for(kind) {
            if outcome.verdict() != Verdict::Pass {
                lines.push(format!("- {}", outcome.detail()));
            }
        }
        let verdict = evaluation.verdict_for(kind).unwrap_or(Verdict::Pass);
        lines.push(format!("status: {}", verdict.status()));
    }

    fn declared(&self, lines: &mut Vec<String>, kind: RuleKind, metadata: &ComplianceMetadata) {
        let ctx = self.context;
        match kind {
            RuleKind::Location => {
                lines.push(format!(
                    "declared processing locations: {}",
                    join_or_none(&metadata.processing_locations)
                ));
                lines.push(format!(
                    "required: {}",
                    join_or_none(&ctx.data_residency.required)
                ));
                lines.push(format!(
                    "prohibited: {}",
                    join_or_none(&ctx.data_residency.prohibited)
                ));
            }
            RuleKind::Risk => {
                let declared = metadata.risk_status.classification;
                let maximum = ctx.risk_classification.maximum_permitted;
                lines.push(format!(
                    "declared classification: {declared} (level {})",
                    declared.ordinal()
                ));
                lines.push(format!(
                    "maximum permitted: {maximum} (level {})",
                    maximum.ordinal()
                ));
            }
            RuleKind::Conformity => {
                let status = &metadata.risk_status;
                lines.push(format!("conformity assessed: {}", status.conformity_assessed));
                lines.push(format!(
                    "notified body: {}",
                    status.notified_body.as_deref().unwrap_or("none")
                ));
                lines.push(format!(
                    "unassessed handling: {}",
                    ctx.unknown_handling.risk_status
                ));
            }
            RuleKind::TransferMechanism => {
                lines.push(format!(
                    "declared mechanisms: {}",
                    join_or_none(&metadata.data_protection.transfer_mechanisms)
                ));
                match &ctx.gdpr_requirements {
                    Some(gdpr) => lines.push(format!(
                        "required mechanisms (any of): {}",
                        join_or_none(&gdpr.transfer_mechanisms_required)
                    )),
                    None => lines.push("GDPR requirements: none".to_owned()),
                }
            }
            RuleKind::SpecialCategory => {
                lines.push(format!(
                    "processes special categories: {}",
                    metadata.data_protection.processes_special_categories
                ));
                let allowed = ctx
                    .gdpr_requirements
                    .as_ref()
                    .and_then(|gdpr| gdpr.special_categories_allowed)
                    .map_or_else(|| "unspecified".to_owned(), |a| a.to_string());
                lines.push(format!("special categories allowed: {allowed}"));
            }
            RuleKind::Certification => {
                lines.push(format!(
                    "held: {}",
                    join_or_none(&metadata.certifications)
                ));
                lines.push(format!(
                    "required (any of): {}",
                    join_or_none(&ctx.certifications.required_any)
                ));
                lines.push(format!(
                    "missing certification handling: {}",
                    ctx.unknown_handling.certifications
                ));
            }
            RuleKind::Sector => {
                lines.push(format!(
                    "suitable for: {}",
                    join_or_none(&metadata.suitable_for)
                ));
                lines.push(format!(
                    "unsuitable for: {}",
                    join_or_none(&metadata.unsuitable_for)
                ));
                lines.push(format!(
                    "prohibited: {}",
                    join_or_none(&ctx.sectors.prohibited)
                ));
                let advisory: BTreeSet<_> = metadata
                    .unsuitable_for
                    .intersection(&ctx.sectors.prohibited)
                    .collect();
                if !advisory.is_empty() {
                    lines.push(format!(
                        "advisory: declared unsuitable for prohibited sectors {}",
                        join_or_none(advisory)
                    ));
                }
            }
            RuleKind::SupplyChain => {
                lines.push(format!(
                    "supply chain disclosed: {}",
                    metadata.supply_chain_disclosed
                ));
            }
            RuleKind::Presence => {}
        }
    }
}

fn join_or_none<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let joined = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "none".to_owned()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pec_policy::evaluate;
    use pec_primitives::{LegacyPolicy, RiskClassification};

    fn context() -> DeploymentContext {
        DeploymentContext::builder("EU AI Act", "European Union", RiskClassification::Limited)
            .require_locations(["EU", "EEA", "ADEQUACY"])
            .prohibit_locations(["US", "CN", "RU"])
            .prohibit_sectors(["biometrics"])
            .build()
            .unwrap()
    }

    fn status_after(lines: &[String], header: &str) -> String {
        let start = lines.iter().position(|l| l == header).expect("section present");
        lines[start..]
            .iter()
            .find(|l| l.starts_with("status: "))
            .cloned()
            .expect("status line")
    }

    #[test]
    fn sections_follow_rule_outcomes() {
        let ctx = context();
        let metadata = ComplianceMetadata::builder(RiskClassification::High)
            .locations(["US", "CN"])
            .unsuitable_for(["biometrics"])
            .supply_chain_disclosed(false)
            .build()
            .unwrap();
        let tool = ToolRecord::new("scanner", metadata).unwrap();
        let evaluation = evaluate(&tool, &ctx);
        let lines = TraceBuilder::new(&ctx).evaluation(&tool, &evaluation);

        assert_eq!(lines[0], "Evaluating tool `scanner` under EU AI Act (European Union)");
        assert_eq!(status_after(&lines, "[Location]"), "status: FAIL");
        assert_eq!(status_after(&lines, "[Risk]"), "status: FAIL");
        assert_eq!(status_after(&lines, "[Conformity]"), "status: FAIL");
        assert_eq!(status_after(&lines, "[Transfer mechanism]"), "status: PASS");
        assert_eq!(status_after(&lines, "[Sector]"), "status: PASS");
        assert_eq!(status_after(&lines, "[Supply chain]"), "status: WARNING");
        assert!(lines.contains(&"- processing location CN is prohibited".to_owned()));
        assert!(lines.contains(
            &"advisory: declared unsuitable for prohibited sectors biometrics".to_owned()
        ));
        assert!(lines.contains(&"compliant: false".to_owned()));
    }

    #[test]
    fn trace_is_deterministic() {
        let ctx = context();
        let metadata = ComplianceMetadata::builder(RiskClassification::Minimal)
            .locations(["DE", "IE"])
            .certifications(["SOC2", "ISO_27001"])
            .build()
            .unwrap();
        let tool = ToolRecord::new("translate", metadata).unwrap();
        let builder = TraceBuilder::new(&ctx);
        let first = builder.evaluation(&tool, &evaluate(&tool, &ctx));
        let second = builder.evaluation(&tool, &evaluate(&tool, &ctx));
        assert_eq!(first, second);
        assert!(first.contains(&"held: ISO_27001, SOC2".to_owned()));
    }

    #[test]
    fn missing_metadata_renders_legacy_section() {
        let ctx = DeploymentContext::builder("EU AI Act", "EU", RiskClassification::Limited)
            .legacy_servers(LegacyPolicy::Warn, true)
            .build()
            .unwrap();
        let tool = ToolRecord::legacy("old").unwrap();
        let lines = TraceBuilder::new(&ctx).evaluation(&tool, &evaluate(&tool, &ctx));

        assert!(lines.contains(&"legacy server policy: warn".to_owned()));
        assert_eq!(status_after(&lines, "[Metadata]"), "status: WARNING");
        assert!(!lines.iter().any(|l| l == "[Risk]"));
        assert!(lines.contains(&"reasons: none".to_owned()));
    }

    #[test]
    fn initialisation_trace_lists_totals() {
        let ctx = context();
        let lines = TraceBuilder::new(&ctx).initialisation(SessionTotals {
            evaluated: 3,
            approved: 2,
            rejected: 1,
        });
        assert_eq!(
            &lines[2..],
            ["tools evaluated: 3", "tools approved: 2", "tools rejected: 1"]
        );
    }
}
