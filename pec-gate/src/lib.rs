//! Compliance gating facade.
//!
//! Depend on this crate via `cargo add pec-gate`. It bundles the internal crates
//! behind feature flags so deployments can pull in only the pieces they use.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use pec_primitives as primitives;

/// Rule evaluation and decision aggregation (enabled by `policy` feature).
#[cfg(feature = "policy")]
pub use pec_policy as policy;

/// Audit logging (enabled by `audit` feature).
#[cfg(feature = "audit")]
pub use pec_audit as audit;

/// Tool filtering and invocation gating (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use pec_tools as tools;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use pec_telemetry as telemetry;

/// Deployment context loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use pec_config as config;
