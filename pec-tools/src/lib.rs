//! Tool cataloguing, compliance filtering, and invocation gating.
//!
//! [`ToolFilter`] partitions discovered tools into admitted and rejected sets
//! while auditing every decision; [`InvocationGuard`] then gates invocation
//! requests against the admitted set.

#![warn(missing_docs, clippy::pedantic)]

pub mod catalog;
mod error;
pub mod filter;
pub mod guard;

pub use catalog::ToolCatalog;
pub use error::{CatalogError, CatalogResult, GuardError};
pub use filter::{FilterOutcome, ToolFilter};
pub use guard::InvocationGuard;
