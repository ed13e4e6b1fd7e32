//! Reference deployment contexts.

use std::collections::BTreeSet;

use pec_primitives::{
    CertificationPolicy, DataResidency, DeploymentContext, LegacyPolicy, LegacyServers,
    RiskClassification, RiskPolicy, SectorPolicy, UnknownHandling, UnknownHandlingPolicy,
};

fn codes(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|code| (*code).to_owned()).collect()
}

/// EU AI Act deployment: processing confined to the EU, EEA and adequacy
/// countries, US, CN and RU prohibited, risk capped at `limited`, strict
/// unknown handling and legacy tools blocked.
#[must_use]
pub fn eu_strict() -> DeploymentContext {
    DeploymentContext {
        governing_law: "EU AI Act".to_owned(),
        jurisdiction: "European Union".to_owned(),
        data_residency: DataResidency {
            required: codes(&["EU", "EEA", "ADEQUACY"]),
            prohibited: codes(&["US", "CN", "RU"]),
        },
        gdpr_requirements: None,
        risk_classification: RiskPolicy {
            maximum_permitted: RiskClassification::Limited,
        },
        sectors: SectorPolicy::default(),
        certifications: CertificationPolicy::default(),
        unknown_handling: UnknownHandlingPolicy::default(),
        legacy_servers: LegacyServers {
            policy: LegacyPolicy::Block,
            log_invocations: true,
        },
    }
}

/// US deployment: US processing only, sanctioned jurisdictions prohibited, risk
/// capped at `high`, permissive unknown handling and legacy tools admitted with
/// a warning.
#[must_use]
pub fn us_permissive() -> DeploymentContext {
    DeploymentContext {
        governing_law: "US Federal".to_owned(),
        jurisdiction: "United States".to_owned(),
        data_residency: DataResidency {
            required: codes(&["US"]),
            prohibited: codes(&["CN", "RU", "IR", "KP"]),
        },
        gdpr_requirements: None,
        risk_classification: RiskPolicy {
            maximum_permitted: RiskClassification::High,
        },
        sectors: SectorPolicy::default(),
        certifications: CertificationPolicy::default(),
        unknown_handling: UnknownHandlingPolicy {
            locations: UnknownHandling::Permissive,
            certifications: UnknownHandling::Permissive,
            risk_status: UnknownHandling::Permissive,
        },
        legacy_servers: LegacyServers {
            policy: LegacyPolicy::Warn,
            log_invocations: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        eu_strict().validate().unwrap();
        us_permissive().validate().unwrap();
    }

    #[test]
    fn eu_preset_is_fail_closed() {
        let ctx = eu_strict();
        assert_eq!(ctx.unknown_handling, UnknownHandlingPolicy::default());
        assert_eq!(ctx.legacy_servers.policy, LegacyPolicy::Block);
        assert!(ctx.data_residency.required.contains("ADEQUACY"));
    }
}
