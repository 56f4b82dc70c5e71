//! Error module orchestrator.
//!
//! Every failure the crate can surface funnels through [`LayoutError`].

mod types;

pub use types::{ConfigError, LayoutError, Result};
