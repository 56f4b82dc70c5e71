//! Layout module orchestrator.
//!
//! `core` holds the immutable partition tree; `compile` turns a parsed
//! [`crate::Grid`] into one by recursive guillotine cuts.

mod compile;
mod core;

pub use compile::{compile, compile_with_metrics};
pub use core::{Leaf, Orientation, PartitionNode, PartitionTree, Spacing, Split};
