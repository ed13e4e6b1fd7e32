//! Candidate tool records as yielded by discovery.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metadata::ComplianceMetadata;

/// A discovered tool and its compliance declaration, if any.
///
/// Metadata is `None` both for tools predating the schema and for tools whose
/// embedded declaration failed to decode upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compliance: Option<ComplianceMetadata>,
}

impl ToolRecord {
    /// Creates a record for a tool that declares compliance metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTool`] when the name is empty.
    pub fn new(name: impl Into<String>, compliance: ComplianceMetadata) -> Result<Self> {
        Self::with_compliance(name, Some(compliance))
    }

    /// Creates a record for a tool without compliance metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTool`] when the name is empty.
    pub fn legacy(name: impl Into<String>) -> Result<Self> {
        Self::with_compliance(name, None)
    }

    /// Creates a record with optional metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTool`] when the name is empty.
    pub fn with_compliance(
        name: impl Into<String>,
        compliance: Option<ComplianceMetadata>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidTool {
                reason: "tool name cannot be empty".into(),
            });
        }
        Ok(Self { name, compliance })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the compliance metadata, if declared.
    #[must_use]
    pub fn compliance(&self) -> Option<&ComplianceMetadata> {
        self.compliance.as_ref()
    }

    /// Returns `true` when the tool carries no metadata.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.compliance.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::RiskClassification;

    #[test]
    fn name_is_required() {
        let err = ToolRecord::legacy("  ").unwrap_err();
        assert!(matches!(err, Error::InvalidTool { .. }));
    }

    #[test]
    fn legacy_tools_have_no_metadata() {
        let legacy = ToolRecord::legacy("weather").unwrap();
        assert!(legacy.is_legacy());

        let metadata = ComplianceMetadata::builder(RiskClassification::Minimal)
            .build()
            .unwrap();
        let declared = ToolRecord::new("translate", metadata).unwrap();
        assert!(!declared.is_legacy());
        assert_eq!(declared.name(), "translate");
    }
}
