//! Ignore rules for required files
//!
//! Configuration carries rules either as a plain string (literal path prefix)
//! or as a `{ pattern = "..." }` table (regular expression). Both are compiled
//! once into `IgnoreRules` so matching never rebuilds a pattern.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{HotrunError, HotrunResult};

/// Ignore rule as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreRuleSpec {
    /// Literal path prefix
    Prefix(String),
    /// Regular expression tested against the full path
    Pattern { pattern: String },
}

impl IgnoreRuleSpec {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        IgnoreRuleSpec::Prefix(prefix.into())
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        IgnoreRuleSpec::Pattern {
            pattern: pattern.into(),
        }
    }
}

/// A compiled ignore rule
#[derive(Debug, Clone)]
pub enum IgnoreRule {
    Prefix(String),
    Pattern(Regex),
}

impl IgnoreRule {
    /// Compile a configured rule
    pub fn compile(spec: &IgnoreRuleSpec) -> HotrunResult<Self> {
        match spec {
            IgnoreRuleSpec::Prefix(prefix) => Ok(IgnoreRule::Prefix(prefix.clone())),
            IgnoreRuleSpec::Pattern { pattern } => Regex::new(pattern)
                .map(IgnoreRule::Pattern)
                .map_err(|source| HotrunError::InvalidIgnorePattern {
                    pattern: pattern.clone(),
                    source,
                }),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            IgnoreRule::Prefix(prefix) => path.starts_with(prefix.as_str()),
            IgnoreRule::Pattern(regex) => regex.is_match(path),
        }
    }
}

/// The full set of compiled ignore rules
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// Create an empty rule set (ignores nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile every configured rule, failing on the first invalid pattern
    pub fn compile(specs: &[IgnoreRuleSpec]) -> HotrunResult<Self> {
        let rules = specs
            .iter()
            .map(IgnoreRule::compile)
            .collect::<HotrunResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Returns true if any rule matches `path`
    pub fn is_ignored(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
