//! The fixed battery of compliance checks.
//!
//! Every check runs on every evaluation and reports through structured
//! [`RuleOutcome`] records. The only early exit is a tool with no metadata.

use std::fmt::{self, Display, Formatter};

use pec_primitives::{
    ComplianceMetadata, DeploymentContext, LegacyPolicy, ToolRecord, UnknownHandling,
};
use serde::{Deserialize, Serialize};

use crate::jurisdiction::{LocationVerdict, ResidencyScope};

/// Category a rule outcome belongs to, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Metadata presence and version.
    Presence,
    /// Processing locations against residency constraints.
    Location,
    /// Risk tier against the ceiling.
    Risk,
    /// Conformity assessment status.
    Conformity,
    /// GDPR transfer mechanisms.
    TransferMechanism,
    /// Special-category personal data.
    SpecialCategory,
    /// Prohibited sectors.
    Sector,
    /// Required certifications.
    Certification,
    /// Supply-chain disclosure.
    SupplyChain,
}

impl RuleKind {
    /// Human-readable section label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Presence => "Metadata",
            Self::Location => "Location",
            Self::Risk => "Risk",
            Self::Conformity => "Conformity",
            Self::TransferMechanism => "Transfer mechanism",
            Self::SpecialCategory => "Special category",
            Self::Sector => "Sector",
            Self::Certification => "Certification",
            Self::SupplyChain => "Supply chain",
        }
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict of a single rule outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Rule satisfied.
    Pass,
    /// Non-fatal concern.
    Warn,
    /// Non-fatal concern that needs manual review.
    Escalate,
    /// Fatal violation.
    Fail,
}

impl Verdict {
    /// Severity rank; higher is worse.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Warn => 1,
            Self::Escalate => 2,
            Self::Fail => 3,
        }
    }

    /// Trace status label.
    #[must_use]
    pub const fn status(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARNING",
            Self::Escalate => "ESCALATE",
            Self::Fail => "FAIL",
        }
    }
}

/// One structured result produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    kind: RuleKind,
    verdict: Verdict,
    detail: String,
}

impl RuleOutcome {
    /// Creates an outcome.
    #[must_use]
    pub fn new(kind: RuleKind, verdict: Verdict, detail: impl Into<String>) -> Self {
        Self {
            kind,
            verdict,
            detail: detail.into(),
        }
    }

    fn pass(kind: RuleKind, detail: impl Into<String>) -> Self {
        Self::new(kind, Verdict::Pass, detail)
    }

    fn fail(kind: RuleKind, detail: impl Into<String>) -> Self {
        Self::new(kind, Verdict::Fail, detail)
    }

    fn warn(kind: RuleKind, detail: impl Into<String>) -> Self {
        Self::new(kind, Verdict::Warn, detail)
    }

    /// Outcome for unknown data, shaped by the context's handling mode.
    fn unknown(kind: RuleKind, mode: UnknownHandling, detail: impl Into<String>) -> Self {
        let verdict = match mode {
            UnknownHandling::Strict => Verdict::Fail,
            UnknownHandling::Permissive => Verdict::Warn,
            UnknownHandling::Escalate => Verdict::Escalate,
        };
        Self::new(kind, verdict, detail)
    }

    /// Returns the rule category.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Returns the verdict.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns the human-readable detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns `true` for fatal outcomes.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.verdict == Verdict::Fail
    }
}

/// Inputs shared by every check of one evaluation.
struct RuleInputs<'a> {
    context: &'a DeploymentContext,
    scope: ResidencyScope,
}

type Check = fn(&ComplianceMetadata, &RuleInputs<'_>, &mut Vec<RuleOutcome>);

/// Checks that run once metadata is known to be present, in evaluation order.
const BATTERY: [Check; 9] = [
    check_version,
    check_locations,
    check_risk,
    check_conformity,
    check_transfer_mechanisms,
    check_special_categories,
    check_sectors,
    check_certifications,
    check_supply_chain,
];

/// Runs the full battery against one tool.
#[must_use]
pub fn run_battery(tool: &ToolRecord, context: &DeploymentContext) -> Vec<RuleOutcome> {
    let Some(metadata) = tool.compliance() else {
        return vec![legacy_outcome(context.legacy_servers.policy)];
    };

    let inputs = RuleInputs {
        context,
        scope: ResidencyScope::from_residency(&context.data_residency),
    };
    let mut outcomes = Vec::with_capacity(BATTERY.len());
    for check in BATTERY {
        check(metadata, &inputs, &mut outcomes);
    }
    outcomes
}

fn legacy_outcome(policy: LegacyPolicy) -> RuleOutcome {
    match policy {
        LegacyPolicy::Block => RuleOutcome::fail(
            RuleKind::Presence,
            "tool declares no compliance metadata and legacy servers are blocked",
        ),
        LegacyPolicy::Warn => RuleOutcome::warn(
            RuleKind::Presence,
            "tool declares no compliance metadata; admitted under legacy warn policy",
        ),
        LegacyPolicy::Allow => RuleOutcome::pass(
            RuleKind::Presence,
            "tool declares no compliance metadata; legacy servers allowed",
        ),
    }
}

fn check_version(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    if metadata.is_versioned() {
        let version = metadata.version.as_deref().unwrap_or_default();
        out.push(RuleOutcome::pass(
            RuleKind::Presence,
            format!("compliance metadata version {version}"),
        ));
    } else if inputs.context.legacy_servers.policy == LegacyPolicy::Block {
        out.push(RuleOutcome::fail(
            RuleKind::Presence,
            "compliance metadata declares no schema version and legacy servers are blocked",
        ));
    } else {
        out.push(RuleOutcome::pass(
            RuleKind::Presence,
            "unversioned compliance metadata accepted as legacy",
        ));
    }
}

fn check_locations(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    let locations = &metadata.processing_locations;
    if locations.is_empty() {
        let detail = "no processing locations declared";
        // Never fatal: an empty declaration has nothing to reject.
        out.push(match inputs.context.unknown_handling.locations {
            UnknownHandling::Strict => RuleOutcome::warn(RuleKind::Location, detail),
            UnknownHandling::Escalate => {
                RuleOutcome::new(RuleKind::Location, Verdict::Escalate, detail)
            }
            UnknownHandling::Permissive => RuleOutcome::pass(RuleKind::Location, detail),
        });
        return;
    }

    let before = out.len();
    for location in locations {
        match inputs.scope.check(location) {
            LocationVerdict::Allowed => {}
            LocationVerdict::Prohibited => out.push(RuleOutcome::fail(
                RuleKind::Location,
                format!("processing location {location} is prohibited"),
            )),
            LocationVerdict::NotRequired => out.push(RuleOutcome::fail(
                RuleKind::Location,
                format!("processing location {location} is outside the required residency"),
            )),
        }
    }
    if out.len() == before {
        out.push(RuleOutcome::pass(
            RuleKind::Location,
            format!("all {} processing locations permitted", locations.len()),
        ));
    }
}

fn check_risk(metadata: &ComplianceMetadata, inputs: &RuleInputs<'_>, out: &mut Vec<RuleOutcome>) {
    let declared = metadata.risk_status.classification;
    let maximum = inputs.context.risk_classification.maximum_permitted;
    if declared.is_within(maximum) {
        out.push(RuleOutcome::pass(
            RuleKind::Risk,
            format!("risk classification {declared} within maximum permitted {maximum}"),
        ));
    } else {
        out.push(RuleOutcome::fail(
            RuleKind::Risk,
            format!("risk classification {declared} exceeds maximum permitted {maximum}"),
        ));
    }
}

fn check_conformity(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    let status = &metadata.risk_status;
    if status.conformity_assessed {
        let detail = match &status.notified_body {
            Some(body) => format!("conformity assessed by {body}"),
            None => "conformity assessed".to_owned(),
        };
        out.push(RuleOutcome::pass(RuleKind::Conformity, detail));
    } else {
        out.push(RuleOutcome::unknown(
            RuleKind::Conformity,
            inputs.context.unknown_handling.risk_status,
            "conformity assessment not completed",
        ));
    }
}

fn check_transfer_mechanisms(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    let required = match &inputs.context.gdpr_requirements {
        Some(gdpr) if !gdpr.transfer_mechanisms_required.is_empty() => {
            &gdpr.transfer_mechanisms_required
        }
        Some(_) => {
            out.push(RuleOutcome::pass(
                RuleKind::TransferMechanism,
                "no transfer mechanism required",
            ));
            return;
        }
        None => {
            out.push(RuleOutcome::pass(
                RuleKind::TransferMechanism,
                "no GDPR requirements declared",
            ));
            return;
        }
    };

    let declared = &metadata.data_protection.transfer_mechanisms;
    let required_list = join(required);
    if declared.is_empty() {
        out.push(RuleOutcome::fail(
            RuleKind::TransferMechanism,
            format!("no transfer mechanisms declared; one of [{required_list}] required"),
        ));
    } else if let Some(matched) = declared.intersection(required).next() {
        out.push(RuleOutcome::pass(
            RuleKind::TransferMechanism,
            format!("transfer mechanism {matched} satisfies requirement"),
        ));
    } else {
        out.push(RuleOutcome::fail(
            RuleKind::TransferMechanism,
            format!(
                "declared transfer mechanisms [{}] include none of required [{required_list}]",
                join(declared)
            ),
        ));
    }
}

fn check_special_categories(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    let allowed = inputs
        .context
        .gdpr_requirements
        .as_ref()
        .and_then(|gdpr| gdpr.special_categories_allowed);
    let processes = metadata.data_protection.processes_special_categories;
    let outcome = match allowed {
        None => RuleOutcome::pass(
            RuleKind::SpecialCategory,
            "special-category processing not restricted",
        ),
        Some(false) if processes => RuleOutcome::fail(
            RuleKind::SpecialCategory,
            "tool processes special categories of personal data, which are not allowed",
        ),
        Some(_) => RuleOutcome::pass(
            RuleKind::SpecialCategory,
            "special-category processing compatible",
        ),
    };
    out.push(outcome);
}

fn check_sectors(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    let before = out.len();
    for sector in inputs
        .context
        .sectors
        .prohibited
        .intersection(&metadata.suitable_for)
    {
        out.push(RuleOutcome::fail(
            RuleKind::Sector,
            format!("tool is suitable for prohibited sector {sector}"),
        ));
    }
    if out.len() == before {
        out.push(RuleOutcome::pass(RuleKind::Sector, "no prohibited sectors"));
    }
}

fn check_certifications(
    metadata: &ComplianceMetadata,
    inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    let required = &inputs.context.certifications.required_any;
    if required.is_empty() {
        out.push(RuleOutcome::pass(
            RuleKind::Certification,
            "no certification required",
        ));
        return;
    }

    match metadata.certifications.intersection(required).next() {
        Some(held) => out.push(RuleOutcome::pass(
            RuleKind::Certification,
            format!("holds required certification {held}"),
        )),
        None => out.push(RuleOutcome::unknown(
            RuleKind::Certification,
            inputs.context.unknown_handling.certifications,
            format!("holds none of the required certifications [{}]", join(required)),
        )),
    }
}

fn check_supply_chain(
    metadata: &ComplianceMetadata,
    _inputs: &RuleInputs<'_>,
    out: &mut Vec<RuleOutcome>,
) {
    if metadata.supply_chain_disclosed {
        out.push(RuleOutcome::pass(
            RuleKind::SupplyChain,
            "supply chain disclosed",
        ));
    } else {
        out.push(RuleOutcome::warn(
            RuleKind::SupplyChain,
            "supply chain not disclosed",
        ));
    }
}

fn join<'a, I, T>(items: I) -> String
where
    I: IntoIterator<Item = &'a T>,
    T: Display + 'a,
{
    items
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
