//! Dependency depth limit
//!
//! - `Unlimited`: every required file is a watch candidate
//! - `Max(n)`: only files nested at most `n` package directories deep

use crate::error::{HotrunError, HotrunResult};

/// Directory name that marks a third-party package boundary
pub const DEFAULT_PACKAGE_DIR: &str = "node_modules";

/// How deep into package directories required files are still watched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    /// Watch dependencies at any nesting level
    Unlimited,
    /// Watch dependencies up to this nesting level (0 = project files only)
    Max(usize),
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit::Max(1)
    }
}

impl DepthLimit {
    /// Build from the config representation, where `-1` means unlimited
    pub fn from_config(value: i64) -> HotrunResult<Self> {
        match value {
            -1 => Ok(DepthLimit::Unlimited),
            n if n >= 0 => Ok(DepthLimit::Max(n as usize)),
            n => Err(HotrunError::InvalidDepth { value: n }),
        }
    }

    /// Returns true if a file at `level` is within the limit
    pub fn allows(&self, level: usize) -> bool {
        match self {
            DepthLimit::Unlimited => true,
            DepthLimit::Max(max) => level <= *max,
        }
    }

    /// Returns true if dependencies below the project are watched at all
    pub fn watches_dependencies(&self) -> bool {
        !matches!(self, DepthLimit::Max(0))
    }
}

impl std::fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthLimit::Unlimited => write!(f, "unlimited"),
            DepthLimit::Max(n) => write!(f, "{}", n),
        }
    }
}
