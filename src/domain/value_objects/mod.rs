//! Domain Value Objects
//!
//! Immutable value types compiled once from configuration.

mod depth;
mod ignore_rule;

pub use depth::{DepthLimit, DEFAULT_PACKAGE_DIR};
pub use ignore_rule::{IgnoreRule, IgnoreRuleSpec, IgnoreRules};
