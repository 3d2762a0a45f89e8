//! hotrun - development process supervisor
//!
//! hotrun runs a script as a child process, learns which files the script
//! loads over a loopback IPC channel, and restarts the child whenever one of
//! those files changes. Compile requests from the child's hook are relayed to
//! an external compiler command.
//!
//! ## Architecture
//!
//! - `domain` - Child messages, supervisor state, dependency filtering, ports
//! - `application` - The `Supervisor` restart coordinator
//! - `infrastructure` - Processes, IPC, notify watchers, notifiers, compiler
//! - `config` - Layered TOML configuration
//! - `presentation` - CLI and dependency wiring

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{ChildCommand, Supervisor, SupervisorEvent, SupervisorOptions};
pub use config::Config;
pub use domain::entities::{ChildError, ChildMessage, CompileRequest};
pub use domain::services::{dependency_level, DependencyFilter};
pub use domain::value_objects::{DepthLimit, IgnoreRuleSpec, IgnoreRules};
pub use error::{HotrunError, HotrunResult};
