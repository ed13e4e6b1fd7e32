//! Deployment context loading for PEC agents.
//!
//! Contexts are read from `.json` or `.toml` files, either by explicit path or
//! through the `PEC_CONTEXT_PATH` environment variable, and validated before
//! they are handed to a session. [`presets`] carries two reference contexts.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod presets;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONTEXT_PATH_ENV, from_env, load, load_context};
