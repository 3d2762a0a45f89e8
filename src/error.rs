//! Error types for hotrun
//!
//! Library code returns `HotrunResult`; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hotrun operations
pub type HotrunResult<T> = Result<T, HotrunError>;

/// Main error type for hotrun operations
#[derive(Error, Debug)]
pub enum HotrunError {
    /// The target script could not be resolved on disk
    #[error("script not found: {path} (also tried {tried})")]
    ScriptNotFound { path: PathBuf, tried: String },

    /// Empty script argument
    #[error("`script` must be a non-empty path")]
    EmptyScript,

    /// Ignore rule that is not a valid regular expression
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Dependency depth below the unlimited sentinel
    #[error("invalid dependency depth {value} (use -1 for unlimited)")]
    InvalidDepth { value: i64 },

    /// The child process could not be spawned
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// File watcher backend failure
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
