//! Structured tracing helpers.

use anyhow::{Context, anyhow};
use pec_primitives::SessionId;
use tracing::{Span, info_span};
use tracing_subscriber::EnvFilter;

/// Subscriber settings used by [`init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    default_directive: String,
    with_target: bool,
    ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".into(),
            with_target: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Sets the filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    /// Toggles printing of event targets.
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Toggles ANSI colouring.
    #[must_use]
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    fn filter(&self) -> anyhow::Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.default_directive)
                .with_context(|| format!("invalid tracing directive `{}`", self.default_directive)),
        }
    }
}

/// Installs a global `fmt` subscriber filtered by `RUST_LOG` or the configured
/// default directive.
///
/// # Errors
///
/// Fails when the directive does not parse or a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter()?)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .with_level(true)
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// Span wrapping everything done for one deployment session.
#[must_use]
pub fn session_span(session: SessionId, jurisdiction: &str) -> Span {
    info_span!("pec.session", %session, jurisdiction)
}

/// Span wrapping the evaluation of one tool.
#[must_use]
pub fn evaluation_span(tool: &str, session: SessionId) -> Span {
    info_span!("pec.evaluate", tool, %session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directive_is_reported() {
        let config = TelemetryConfig::default().with_default_directive("pec=loud");
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(config.filter().is_err());
        }
    }

    #[test]
    fn second_init_fails_instead_of_panicking() {
        let config = TelemetryConfig::default()
            .with_default_directive("warn")
            .with_ansi(false);
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }

    #[test]
    fn spans_can_be_entered() {
        let span = evaluation_span("translate", SessionId::random());
        let _guard = span.enter();
        let _session = session_span(SessionId::random(), "European Union");
    }
}
