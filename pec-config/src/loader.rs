//! File and environment loaders.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pec_primitives::DeploymentContext;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming the context file.
pub const CONTEXT_PATH_ENV: &str = "PEC_CONTEXT_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn detect(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads, decodes and validates a deployment context file.
///
/// # Errors
///
/// Returns [`ConfigError`] on I/O failure, unsupported extension, parse
/// failure, or when the decoded context does not validate.
pub fn load_context(path: impl AsRef<Path>) -> ConfigResult<DeploymentContext> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let context = parse(&raw, format)?;
    context.validate()?;
    debug!(
        path = %path.display(),
        jurisdiction = %context.jurisdiction,
        "deployment context loaded"
    );
    Ok(context)
}

/// Loads from an explicit path, falling back to [`CONTEXT_PATH_ENV`].
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnv`] when neither source names a file, and
/// any [`load_context`] error otherwise.
pub fn load(path: Option<&Path>) -> ConfigResult<DeploymentContext> {
    let path = resolve_path(path, env::var_os(CONTEXT_PATH_ENV).map(PathBuf::from))?;
    load_context(path)
}

/// Loads the file named by [`CONTEXT_PATH_ENV`].
///
/// # Errors
///
/// Same as [`load`].
pub fn from_env() -> ConfigResult<DeploymentContext> {
    load(None)
}

fn resolve_path(explicit: Option<&Path>, from_env: Option<PathBuf>) -> ConfigResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    from_env
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(ConfigError::MissingEnv {
            var: CONTEXT_PATH_ENV,
        })
}

fn parse(raw: &str, format: Format) -> ConfigResult<DeploymentContext> {
    Ok(match format {
        Format::Json => serde_json::from_str(raw)?,
        Format::Toml => toml::from_str(raw)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pec_primitives::{LegacyPolicy, RiskClassification, UnknownHandling};
    use std::io::Write;

    const JSON_CONTEXT: &str = r#"{
        "governingLaw": "EU AI Act",
        "jurisdiction": "European Union",
        "dataResidency": { "required": ["EU", "EEA"], "prohibited": ["US"] },
        "riskClassification": { "maximumPermitted": "limited" },
        "unknownHandling": { "locations": "escalate" },
        "legacyServers": { "policy": "warn" }
    }"#;

    const TOML_CONTEXT: &str = r#"
governingLaw = "US Federal"
jurisdiction = "United States"

[dataResidency]
required = ["US"]
prohibited = ["CN", "RU"]

[riskClassification]
maximumPermitted = "high"

[gdprRequirements]
transferMechanismsRequired = ["sccs", "bcrs"]

[legacyServers]
policy = "allow"
logInvocations = false
"#;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_context_with_defaults() {
        let file = write_temp(".json", JSON_CONTEXT);
        let ctx = load_context(file.path()).unwrap();

        assert_eq!(ctx.risk_classification.maximum_permitted, RiskClassification::Limited);
        assert_eq!(ctx.unknown_handling.locations, UnknownHandling::Escalate);
        assert_eq!(ctx.unknown_handling.certifications, UnknownHandling::Strict);
        assert_eq!(ctx.legacy_servers.policy, LegacyPolicy::Warn);
        assert!(ctx.legacy_servers.log_invocations);
    }

    #[test]
    fn loads_toml_context() {
        let file = write_temp(".toml", TOML_CONTEXT);
        let ctx = load_context(file.path()).unwrap();

        assert_eq!(ctx.jurisdiction, "United States");
        assert!(ctx.data_residency.prohibited.contains("RU"));
        assert_eq!(
            ctx.gdpr_requirements.unwrap().transfer_mechanisms_required.len(),
            2
        );
        assert!(!ctx.legacy_servers.log_invocations);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let file = write_temp(".yaml", JSON_CONTEXT);
        let err = load_context(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn rejects_unknown_enumeration_values() {
        let file = write_temp(
            ".json",
            &JSON_CONTEXT.replace("\"limited\"", "\"extreme\""),
        );
        assert!(matches!(
            load_context(file.path()).unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn rejects_contexts_that_fail_validation() {
        let file = write_temp(
            ".json",
            &JSON_CONTEXT.replace("\"European Union\"", "\"  \""),
        );
        assert!(matches!(
            load_context(file.path()).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_context(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let explicit = Path::new("explicit.toml");
        let resolved = resolve_path(Some(explicit), Some(PathBuf::from("env.json"))).unwrap();
        assert_eq!(resolved, explicit);
        assert_eq!(
            resolve_path(None, Some(PathBuf::from("env.json"))).unwrap(),
            PathBuf::from("env.json")
        );
    }

    #[test]
    fn unset_or_empty_environment_is_an_error() {
        for value in [None, Some(PathBuf::new())] {
            assert!(matches!(
                resolve_path(None, value),
                Err(ConfigError::MissingEnv { var: CONTEXT_PATH_ENV })
            ));
        }
    }
}
