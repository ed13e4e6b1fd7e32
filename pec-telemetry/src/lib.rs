//! Observability utilities for PEC tool gating.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support;

pub use tracing_support::{TelemetryConfig, evaluation_span, init_tracing, session_span};
