//! Deployment context declared by the deployer for one session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metadata::{RiskClassification, TransferMechanism};

labelled_enum! {
    /// Treatment of missing or unassessed data along one dimension.
    pub enum UnknownHandling ("unknown handling mode") {
        /// Unknown data is a violation.
        Strict => "strict",
        /// Unknown data is tolerated with a warning.
        Permissive => "permissive",
        /// Unknown data is flagged for manual review.
        Escalate => "escalate",
    }
}

labelled_enum! {
    /// Admission rule for tools that carry no compliance metadata.
    pub enum LegacyPolicy ("legacy server policy") {
        /// Admit silently.
        Allow => "allow",
        /// Admit with a warning.
        Warn => "warn",
        /// Reject.
        Block => "block",
    }
}

/// Location constraints; codes may be concrete or aggregate (`EU`, `EEA`, `ADEQUACY`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResidency {
    /// Codes where processing is allowed.
    #[serde(default)]
    pub required: BTreeSet<String>,
    /// Codes where processing is forbidden; overrides `required`.
    #[serde(default)]
    pub prohibited: BTreeSet<String>,
}

/// GDPR-specific obligations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdprRequirements {
    /// At least one of these mechanisms must be declared by the tool.
    #[serde(default)]
    pub transfer_mechanisms_required: BTreeSet<TransferMechanism>,
    /// Whether special-category processing is acceptable; `None` leaves it open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_categories_allowed: Option<bool>,
}

/// Risk ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPolicy {
    /// Highest tier a tool may declare.
    pub maximum_permitted: RiskClassification,
}

/// Sector restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorPolicy {
    /// Sector tags a tool must not advertise.
    #[serde(default)]
    pub prohibited: BTreeSet<String>,
}

/// Certification requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationPolicy {
    /// Satisfied when the tool holds at least one of these.
    #[serde(default)]
    pub required_any: BTreeSet<String>,
}

/// Per-dimension handling of unknown or unassessed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownHandlingPolicy {
    /// Missing processing locations.
    #[serde(default = "strict")]
    pub locations: UnknownHandling,
    /// Missing required certifications.
    #[serde(default = "strict")]
    pub certifications: UnknownHandling,
    /// Missing conformity assessment.
    #[serde(default = "strict")]
    pub risk_status: UnknownHandling,
}

impl Default for UnknownHandlingPolicy {
    fn default() -> Self {
        Self {
            locations: UnknownHandling::Strict,
            certifications: UnknownHandling::Strict,
            risk_status: UnknownHandling::Strict,
        }
    }
}

fn strict() -> UnknownHandling {
    UnknownHandling::Strict
}

fn enabled() -> bool {
    true
}

/// Handling of tools without compliance metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyServers {
    /// Admission rule.
    pub policy: LegacyPolicy,
    /// Whether invocations of admitted legacy tools are audited.
    #[serde(default = "enabled")]
    pub log_invocations: bool,
}

impl Default for LegacyServers {
    fn default() -> Self {
        Self {
            policy: LegacyPolicy::Block,
            log_invocations: true,
        }
    }
}

/// Deployer policy constraints, immutable for the duration of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentContext {
    /// Governing law, for display and audit.
    pub governing_law: String,
    /// Jurisdiction, for display and audit.
    pub jurisdiction: String,
    /// Location constraints.
    #[serde(default)]
    pub data_residency: DataResidency,
    /// GDPR obligations, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdpr_requirements: Option<GdprRequirements>,
    /// Risk ceiling.
    pub risk_classification: RiskPolicy,
    /// Sector restrictions.
    #[serde(default)]
    pub sectors: SectorPolicy,
    /// Certification requirements.
    #[serde(default)]
    pub certifications: CertificationPolicy,
    /// Unknown-data handling.
    #[serde(default)]
    pub unknown_handling: UnknownHandlingPolicy,
    /// Legacy tool handling.
    #[serde(default)]
    pub legacy_servers: LegacyServers,
}

/// The three context fields snapshotted into every audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    /// Governing law.
    pub governing_law: String,
    /// Jurisdiction.
    pub jurisdiction: String,
    /// Risk ceiling.
    pub max_risk_classification: RiskClassification,
}

impl DeploymentContext {
    /// Starts building a context. Everything not set explicitly is fail-closed:
    /// empty allow-lists, strict unknown handling, legacy tools blocked.
    #[must_use]
    pub fn builder(
        governing_law: impl Into<String>,
        jurisdiction: impl Into<String>,
        maximum_risk: RiskClassification,
    ) -> DeploymentContextBuilder {
        DeploymentContextBuilder {
            inner: Self {
                governing_law: governing_law.into(),
                jurisdiction: jurisdiction.into(),
                data_residency: DataResidency::default(),
                gdpr_requirements: None,
                risk_classification: RiskPolicy {
                    maximum_permitted: maximum_risk,
                },
                sectors: SectorPolicy::default(),
                certifications: CertificationPolicy::default(),
                unknown_handling: UnknownHandlingPolicy::default(),
                legacy_servers: LegacyServers::default(),
            },
        }
    }

    /// Decodes and validates a context from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] for undecodable documents (including unknown
    /// enumeration values) and [`Error::InvalidContext`] when validation fails.
    pub fn from_json(document: &str) -> Result<Self> {
        let context: Self = serde_json::from_str(document)?;
        context.validate()?;
        Ok(context)
    }

    /// Checks structural constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContext`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.governing_law.trim().is_empty() {
            return Err(Error::invalid_context("governing law cannot be empty"));
        }
        if self.jurisdiction.trim().is_empty() {
            return Err(Error::invalid_context("jurisdiction cannot be empty"));
        }
        let residency = &self.data_residency;
        if residency
            .required
            .iter()
            .chain(&residency.prohibited)
            .any(|code| code.trim().is_empty())
        {
            return Err(Error::invalid_context("residency codes cannot be empty"));
        }
        if self.sectors.prohibited.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::invalid_context("prohibited sector tags cannot be empty"));
        }
        Ok(())
    }

    /// Returns the summary snapshotted into audit entries.
    #[must_use]
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            governing_law: self.governing_law.clone(),
            jurisdiction: self.jurisdiction.clone(),
            max_risk_classification: self.risk_classification.maximum_permitted,
        }
    }
}

/// Builder for [`DeploymentContext`].
#[derive(Debug, Clone)]
pub struct DeploymentContextBuilder {
    inner: DeploymentContext,
}

impl DeploymentContextBuilder {
    /// Adds codes to the residency allow-list.
    #[must_use]
    pub fn require_locations<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .data_residency
            .required
            .extend(codes.into_iter().map(Into::into));
        self
    }

    /// Adds codes to the residency block-list.
    #[must_use]
    pub fn prohibit_locations<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .data_residency
            .prohibited
            .extend(codes.into_iter().map(Into::into));
        self
    }

    /// Sets GDPR obligations.
    #[must_use]
    pub fn gdpr(mut self, requirements: GdprRequirements) -> Self {
        self.inner.gdpr_requirements = Some(requirements);
        self
    }

    /// Adds prohibited sector tags.
    #[must_use]
    pub fn prohibit_sectors<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .sectors
            .prohibited
            .extend(sectors.into_iter().map(Into::into));
        self
    }

    /// Adds certifications of which at least one is required.
    #[must_use]
    pub fn require_any_certification<I, S>(mut self, certifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .certifications
            .required_any
            .extend(certifications.into_iter().map(Into::into));
        self
    }

    /// Replaces the unknown-data handling policy.
    #[must_use]
    pub fn unknown_handling(mut self, policy: UnknownHandlingPolicy) -> Self {
        self.inner.unknown_handling = policy;
        self
    }

    /// Replaces the legacy tool handling.
    #[must_use]
    pub fn legacy_servers(mut self, policy: LegacyPolicy, log_invocations: bool) -> Self {
        self.inner.legacy_servers = LegacyServers {
            policy,
            log_invocations,
        };
        self
    }

    /// Validates and returns the context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContext`] when validation fails.
    pub fn build(self) -> Result<DeploymentContext> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
