use std::num::NonZeroUsize;

use pec_gate::audit::{AuditEventKind, AuditRecorder, MemoryAuditStore};
use pec_gate::config::presets::{eu_strict, us_permissive};
use pec_gate::policy::{RuleKind, Verdict, evaluate};
use pec_gate::primitives::{
    ComplianceMetadata, DeploymentContext, LegacyPolicy, RiskClassification, ToolRecord,
};
use pec_gate::tools::{GuardError, InvocationGuard, ToolCatalog, ToolFilter};
use serde_json::Value;

fn eu_tool() -> ToolRecord {
    let metadata = ComplianceMetadata::builder(RiskClassification::Limited)
        .locations(["DE", "IE"])
        .conformity_assessed(true)
        .certifications(["ISO_27001"])
        .build()
        .unwrap();
    ToolRecord::new("translator", metadata).unwrap()
}

fn offshore_tool() -> ToolRecord {
    let metadata = ComplianceMetadata::builder(RiskClassification::High)
        .locations(["US", "CN"])
        .conformity_assessed(false)
        .build()
        .unwrap();
    ToolRecord::new("scraper", metadata).unwrap()
}

fn legacy_context(policy: LegacyPolicy) -> DeploymentContext {
    DeploymentContext {
        legacy_servers: pec_gate::primitives::LegacyServers {
            policy,
            log_invocations: true,
        },
        ..eu_strict()
    }
}

#[test]
fn eu_resident_tool_is_admitted_under_eu_context() {
    let result = evaluate(&eu_tool(), &eu_strict()).into_result();
    assert!(result.is_compliant());
    assert!(result.reasons().is_empty());
}

#[test]
fn eu_resident_tool_is_rejected_under_us_context() {
    let result = evaluate(&eu_tool(), &us_permissive()).into_result();
    assert!(!result.is_compliant());
    for code in ["DE", "IE"] {
        let expected = format!("processing location {code} is outside the required residency");
        assert!(result.reasons().contains(&expected), "missing {expected}");
    }
}

#[test]
fn offshore_high_risk_tool_collects_every_violation() {
    let evaluation = evaluate(&offshore_tool(), &eu_strict());
    let reasons = evaluation.result().reasons();

    assert!(!evaluation.result().is_compliant());
    assert!(reasons.contains(&"processing location CN is prohibited".to_owned()));
    assert!(
        reasons.contains(&"risk classification high exceeds maximum permitted limited".to_owned())
    );
    assert!(reasons.contains(&"conformity assessment not completed".to_owned()));
    for kind in [RuleKind::Location, RuleKind::Risk, RuleKind::Conformity] {
        assert_eq!(evaluation.verdict_for(kind), Some(Verdict::Fail));
    }
    assert_eq!(evaluation.verdict_for(RuleKind::SupplyChain), Some(Verdict::Pass));
}

#[test]
fn legacy_tool_follows_legacy_policy() {
    let tool = ToolRecord::legacy("weather").unwrap();

    let warned = evaluate(&tool, &legacy_context(LegacyPolicy::Warn));
    assert!(warned.result().is_compliant());
    assert_eq!(warned.result().warnings().len(), 1);
    assert!(warned.result().reasons().is_empty());

    let blocked = evaluate(&tool, &legacy_context(LegacyPolicy::Block));
    assert!(!blocked.result().is_compliant());
    assert_eq!(blocked.result().reasons().len(), 1);
    assert_eq!(blocked.outcomes().len(), 1);
}

#[test]
fn prohibited_aggregate_overrides_required_country() {
    let ctx = DeploymentContext::builder("EU AI Act", "European Union", RiskClassification::High)
        .require_locations(["FR"])
        .prohibit_locations(["EU"])
        .build()
        .unwrap();
    let metadata = ComplianceMetadata::builder(RiskClassification::Minimal)
        .locations(["FR"])
        .conformity_assessed(true)
        .build()
        .unwrap();
    let result = evaluate(&ToolRecord::new("fr-only", metadata).unwrap(), &ctx).into_result();
    assert_eq!(result.reasons(), ["processing location FR is prohibited"]);
}

#[test]
fn repeated_evaluation_is_identical() {
    let ctx = eu_strict();
    let tool = offshore_tool();
    assert_eq!(evaluate(&tool, &ctx), evaluate(&tool, &ctx));
}

#[test]
fn full_session_is_audited_in_order() {
    let ctx = legacy_context(LegacyPolicy::Warn);
    let store = MemoryAuditStore::new();
    let session = store.open_session(&ctx).unwrap();
    let recorder = AuditRecorder::new(&store, session, &ctx);

    let catalog = ToolCatalog::from_tools([
        eu_tool(),
        offshore_tool(),
        ToolRecord::legacy("weather").unwrap(),
    ])
    .unwrap();
    let outcome = ToolFilter::new().filter(catalog, &recorder).unwrap();
    let admitted: Vec<_> = outcome.admitted().iter().map(ToolRecord::name).collect();
    assert_eq!(admitted, ["translator", "weather"]);
    assert_eq!(outcome.rejected()[0].0.name(), "scraper");

    recorder.record_initialisation(outcome.totals()).unwrap();

    let guard = InvocationGuard::new(&outcome, recorder);
    guard.authorize("translator").unwrap();
    assert!(matches!(
        guard.authorize("scraper"),
        Err(GuardError::Blocked { .. })
    ));

    let log = store.snapshot(session).unwrap();
    let kinds: Vec<_> = log.entries().iter().map(|e| e.event_type()).collect();
    assert_eq!(
        kinds,
        [
            AuditEventKind::ToolApproved,
            AuditEventKind::ToolRejected,
            AuditEventKind::ToolApproved,
            AuditEventKind::ComplianceWarning,
            AuditEventKind::AgentInitialisation,
            AuditEventKind::ToolInvocation,
            AuditEventKind::ToolInvocationBlocked,
        ]
    );

    let json: Value = serde_json::from_str(&store.export_json(session).unwrap()).unwrap();
    assert_eq!(json["sessionId"], session.to_string());
    let hash = json["contextHash"].as_str().unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 7);
    let rejected = &entries[1];
    assert_eq!(rejected["eventType"], "tool_rejected");
    assert_eq!(rejected["toolName"], "scraper");
    assert_eq!(rejected["evaluationResult"]["compliant"], false);
    assert_eq!(rejected["context"]["maxRiskClassification"], "limited");
    let reasoning: Vec<_> = rejected["reasoning"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(reasoning.contains(&"[Risk]"));
    assert_eq!(reasoning.last(), Some(&"warnings: none"));
    assert_eq!(entries[4]["toolName"], Value::Null);
}

#[test]
fn parallel_filtering_matches_sequential() {
    let ctx = legacy_context(LegacyPolicy::Allow);
    let batch = || {
        (0..12)
            .map(|i| if i % 3 == 0 { offshore_tool() } else { eu_tool() })
            .enumerate()
            .map(|(i, tool)| {
                let metadata = tool.compliance().cloned().unwrap();
                ToolRecord::new(format!("tool-{i}"), metadata).unwrap()
            })
            .collect::<Vec<_>>()
    };

    let store = MemoryAuditStore::new();
    let seq_session = store.open_session(&ctx).unwrap();
    let par_session = store.open_session(&ctx).unwrap();
    let sequential = ToolFilter::new()
        .filter(batch(), &AuditRecorder::new(&store, seq_session, &ctx))
        .unwrap();
    let parallel = ToolFilter::new()
        .filter_parallel(
            batch(),
            &AuditRecorder::new(&store, par_session, &ctx),
            NonZeroUsize::new(4).unwrap(),
        )
        .unwrap();

    assert_eq!(sequential, parallel);
    let names = |session| {
        store
            .snapshot(session)
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.tool_name().map(str::to_owned))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(seq_session), names(par_session));
}
