//! Dependency depth filter
//!
//! Decides whether a file the child just required should join the watch set.
//! The nesting level of a path is the number of package directories found in
//! the prefix ending at the last package directory:
//!
//! ```text
//! /proj/src/a.js                                  -> 0
//! /proj/node_modules/foo/index.js                 -> 1
//! /proj/node_modules/foo/node_modules/bar/x.js    -> 2
//! ```

use crate::domain::value_objects::{DepthLimit, IgnoreRules, DEFAULT_PACKAGE_DIR};

/// Nesting level of `path` relative to `boundary` package directories
pub fn dependency_level(path: &str, boundary: &str) -> usize {
    if boundary.is_empty() {
        return 0;
    }
    match path.rfind(boundary) {
        Some(index) => path[..index + boundary.len()].matches(boundary).count(),
        None => 0,
    }
}

/// Returns true iff `path` is not ignored and lies within `limit`
pub fn should_watch(path: &str, rules: &IgnoreRules, limit: DepthLimit, boundary: &str) -> bool {
    !rules.is_ignored(path) && limit.allows(dependency_level(path, boundary))
}

/// Precompiled filter applied to every `required` message
#[derive(Debug, Clone)]
pub struct DependencyFilter {
    rules: IgnoreRules,
    limit: DepthLimit,
    boundary: String,
}

impl Default for DependencyFilter {
    fn default() -> Self {
        Self::new(IgnoreRules::empty(), DepthLimit::default())
    }
}

impl DependencyFilter {
    pub fn new(rules: IgnoreRules, limit: DepthLimit) -> Self {
        Self {
            rules,
            limit,
            boundary: DEFAULT_PACKAGE_DIR.to_string(),
        }
    }

    /// Use a different package directory name as the nesting boundary
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = boundary.into();
        self
    }

    pub fn limit(&self) -> DepthLimit {
        self.limit
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn should_watch(&self, path: &str) -> bool {
        should_watch(path, &self.rules, self.limit, &self.boundary)
    }
}
