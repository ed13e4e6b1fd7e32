//! Compliance metadata declared by a tool (the PEC record).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

labelled_enum! {
    /// Regulatory risk tier assigned to an AI capability.
    ///
    /// Declaration order is the total order used for threshold comparisons:
    /// `minimal < limited < gpai < high < gpai_systemic < unacceptable`.
    pub enum RiskClassification ("risk classification") {
        /// No specific obligations.
        Minimal => "minimal",
        /// Transparency obligations only.
        Limited => "limited",
        /// General-purpose AI model.
        Gpai => "gpai",
        /// High-risk system requiring conformity assessment.
        High => "high",
        /// General-purpose AI model with systemic risk.
        GpaiSystemic => "gpai_systemic",
        /// Prohibited practice.
        Unacceptable => "unacceptable",
    }
}

impl RiskClassification {
    /// Returns the 0-based rank of the tier within the total order.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns `true` when the tier does not exceed `maximum`.
    #[must_use]
    pub fn is_within(self, maximum: Self) -> bool {
        self <= maximum
    }
}

labelled_enum! {
    /// Data-protection role the tool operator holds.
    pub enum ControllerStatus ("controller status") {
        /// Determines purposes and means of processing.
        Controller => "controller",
        /// Processes on behalf of a controller.
        Processor => "processor",
        /// Shares determination with another controller.
        JointController => "joint_controller",
    }
}

labelled_enum! {
    /// Legal basis permitting cross-border personal-data transfer.
    pub enum TransferMechanism ("transfer mechanism") {
        /// Destination covered by an adequacy decision.
        Adequacy => "adequacy",
        /// Standard contractual clauses.
        Sccs => "sccs",
        /// Binding corporate rules.
        Bcrs => "bcrs",
        /// Approved codes of conduct.
        CodesOfConduct => "codes_of_conduct",
        /// Approved certification mechanism.
        Certification => "certification",
        /// Derogation for a specific situation.
        Derogation => "derogation",
    }
}

labelled_enum! {
    /// How often the tool refreshes its compliance declaration.
    pub enum UpdateFrequency ("update frequency") {
        /// Updated as changes happen.
        Continuous => "continuous",
        /// Updated daily.
        Daily => "daily",
        /// Updated weekly.
        Weekly => "weekly",
        /// Updated monthly.
        Monthly => "monthly",
        /// Updated quarterly.
        Quarterly => "quarterly",
        /// Updated yearly.
        Annually => "annually",
        /// Updated without a fixed cadence.
        AdHoc => "ad_hoc",
    }
}

/// Risk tier and conformity status of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskStatus {
    /// Declared risk tier.
    pub classification: RiskClassification,
    /// Whether a conformity assessment has been completed.
    #[serde(default)]
    pub conformity_assessed: bool,
    /// Notified body that performed the assessment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_body: Option<String>,
}

/// Data-protection posture of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProtection {
    /// Role held by the tool operator.
    pub controller_status: ControllerStatus,
    /// Transfer mechanisms the operator relies on.
    #[serde(default)]
    pub transfer_mechanisms: BTreeSet<TransferMechanism>,
    /// Whether the operator is registered with a supervisory authority.
    #[serde(default)]
    pub registered: bool,
    /// Whether the tool processes special categories of personal data.
    #[serde(default)]
    pub processes_special_categories: bool,
}

/// Freshness of the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// When the declaration was last updated.
    pub last_updated: DateTime<Utc>,
    /// Declared refresh cadence.
    pub update_frequency: UpdateFrequency,
}

/// Compliance metadata declared by a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMetadata {
    /// Schema version; absent or empty means legacy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Location codes where data is processed, in declaration order.
    #[serde(default)]
    pub processing_locations: Vec<String>,
    /// Retention period in days.
    #[serde(default)]
    pub retention_days: u32,
    /// Certifications held by the operator.
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    /// Risk tier and conformity status.
    pub risk_status: RiskStatus,
    /// Data-protection posture.
    pub data_protection: DataProtection,
    /// Sectors the tool advertises itself for.
    #[serde(default)]
    pub suitable_for: BTreeSet<String>,
    /// Sectors the tool declares itself unsuitable for.
    #[serde(default)]
    pub unsuitable_for: BTreeSet<String>,
    /// Whether upstream suppliers are disclosed.
    #[serde(default)]
    pub supply_chain_disclosed: bool,
    /// Declaration freshness.
    pub currency: Currency,
}

impl ComplianceMetadata {
    /// Starts building a metadata record with the given risk tier.
    #[must_use]
    pub fn builder(classification: RiskClassification) -> ComplianceMetadataBuilder {
        ComplianceMetadataBuilder::new(classification)
    }

    /// Decodes a metadata record from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when the document does not decode, including
    /// unknown enumeration values.
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Returns `true` when a non-empty schema version is declared.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.version.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

/// Builder for [`ComplianceMetadata`].
#[derive(Debug, Clone)]
pub struct ComplianceMetadataBuilder {
    version: Option<String>,
    processing_locations: Vec<String>,
    retention_days: u32,
    certifications: BTreeSet<String>,
    risk_status: RiskStatus,
    data_protection: DataProtection,
    suitable_for: BTreeSet<String>,
    unsuitable_for: BTreeSet<String>,
    supply_chain_disclosed: bool,
    currency: Currency,
}

impl ComplianceMetadataBuilder {
    fn new(classification: RiskClassification) -> Self {
        Self {
            version: Some("1.0".into()),
            processing_locations: Vec::new(),
            retention_days: 0,
            certifications: BTreeSet::new(),
            risk_status: RiskStatus {
                classification,
                conformity_assessed: false,
                notified_body: None,
            },
            data_protection: DataProtection {
                controller_status: ControllerStatus::Processor,
                transfer_mechanisms: BTreeSet::new(),
                registered: false,
                processes_special_categories: false,
            },
            suitable_for: BTreeSet::new(),
            unsuitable_for: BTreeSet::new(),
            supply_chain_disclosed: true,
            currency: Currency {
                last_updated: Utc::now(),
                update_frequency: UpdateFrequency::Monthly,
            },
        }
    }

    /// Sets the schema version; `None` marks the record as legacy.
    #[must_use]
    pub fn version(mut self, version: Option<&str>) -> Self {
        self.version = version.map(str::to_owned);
        self
    }

    /// Appends processing locations in order.
    #[must_use]
    pub fn locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processing_locations
            .extend(locations.into_iter().map(Into::into));
        self
    }

    /// Sets the retention period.
    #[must_use]
    pub fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Adds held certifications.
    #[must_use]
    pub fn certifications<I, S>(mut self, certifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.certifications
            .extend(certifications.into_iter().map(Into::into));
        self
    }

    /// Marks the conformity assessment as done or pending.
    #[must_use]
    pub fn conformity_assessed(mut self, assessed: bool) -> Self {
        self.risk_status.conformity_assessed = assessed;
        self
    }

    /// Records the notified body.
    #[must_use]
    pub fn notified_body(mut self, body: impl Into<String>) -> Self {
        self.risk_status.notified_body = Some(body.into());
        self
    }

    /// Sets the controller role.
    #[must_use]
    pub fn controller_status(mut self, status: ControllerStatus) -> Self {
        self.data_protection.controller_status = status;
        self
    }

    /// Adds transfer mechanisms.
    #[must_use]
    pub fn transfer_mechanisms<I>(mut self, mechanisms: I) -> Self
    where
        I: IntoIterator<Item = TransferMechanism>,
    {
        self.data_protection.transfer_mechanisms.extend(mechanisms);
        self
    }

    /// Marks supervisory registration.
    #[must_use]
    pub fn registered(mut self, registered: bool) -> Self {
        self.data_protection.registered = registered;
        self
    }

    /// Declares whether special categories are processed.
    #[must_use]
    pub fn special_categories(mut self, processes: bool) -> Self {
        self.data_protection.processes_special_categories = processes;
        self
    }

    /// Adds advertised sectors.
    #[must_use]
    pub fn suitable_for<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suitable_for.extend(sectors.into_iter().map(Into::into));
        self
    }

    /// Adds sectors the tool is unsuitable for.
    #[must_use]
    pub fn unsuitable_for<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unsuitable_for.extend(sectors.into_iter().map(Into::into));
        self
    }

    /// Declares whether the supply chain is disclosed.
    #[must_use]
    pub fn supply_chain_disclosed(mut self, disclosed: bool) -> Self {
        self.supply_chain_disclosed = disclosed;
        self
    }

    /// Sets the declaration freshness.
    #[must_use]
    pub fn currency(mut self, last_updated: DateTime<Utc>, frequency: UpdateFrequency) -> Self {
        self.currency = Currency {
            last_updated,
            update_frequency: frequency,
        };
        self
    }

    /// Finalises the metadata record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] when a processing location or
    /// certification is blank.
    pub fn build(self) -> Result<ComplianceMetadata> {
        if self
            .processing_locations
            .iter()
            .any(|code| code.trim().is_empty())
        {
            return Err(Error::InvalidMetadata {
                reason: "processing location codes cannot be empty".into(),
            });
        }
        if self.certifications.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::InvalidMetadata {
                reason: "certification identifiers cannot be empty".into(),
            });
        }

        Ok(ComplianceMetadata {
            version: self.version,
            processing_locations: self.processing_locations,
            retention_days: self.retention_days,
            certifications: self.certifications,
            risk_status: self.risk_status,
            data_protection: self.data_protection,
            suitable_for: self.suitable_for,
            unsuitable_for: self.unsuitable_for,
            supply_chain_disclosed: self.supply_chain_disclosed,
            currency: self.currency,
        })
    }
}
