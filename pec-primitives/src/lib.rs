//! Core shared types for PEC tool gating.

#![warn(missing_docs, clippy::pedantic)]

#[macro_use]
mod macros;

mod context;
mod error;
mod ids;
mod metadata;
mod tool;

/// Deployer-side policy constraints.
pub use context::{
    CertificationPolicy, ContextSummary, DataResidency, DeploymentContext,
    DeploymentContextBuilder, GdprRequirements, LegacyPolicy, LegacyServers, RiskPolicy,
    SectorPolicy, UnknownHandling, UnknownHandlingPolicy,
};
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Session and audit entry identifiers.
pub use ids::{EntryId, SessionId};
/// Tool-side compliance declaration.
pub use metadata::{
    ComplianceMetadata, ComplianceMetadataBuilder, ControllerStatus, Currency, DataProtection,
    RiskClassification, RiskStatus, TransferMechanism, UpdateFrequency,
};
/// Candidate tool records.
pub use tool::ToolRecord;
