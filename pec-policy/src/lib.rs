//! Compliance evaluation for PEC-declared tools.
//!
//! [`jurisdiction`] expands residency codes, [`rules`] runs the fixed check
//! battery, [`decision`] folds outcomes into an [`EvaluationResult`], and
//! [`engine`] exposes the [`ComplianceEngine`] seam.

#![warn(missing_docs, clippy::pedantic)]

pub mod decision;
pub mod engine;
pub mod jurisdiction;
pub mod rules;

pub use decision::{Evaluation, EvaluationResult};
pub use engine::{ComplianceEngine, RuleEngine, evaluate};
pub use jurisdiction::{AggregateRegion, LocationVerdict, ResidencyScope, expand};
pub use rules::{RuleKind, RuleOutcome, Verdict};
