//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the supervisor.
//! Infrastructure layer provides concrete implementations.

pub mod child_launcher;
pub mod compilation_service;
pub mod notifier;
pub mod watch_set;

pub use child_launcher::{ChildLauncher, LaunchSpec};
pub use compilation_service::CompilationService;
pub use notifier::{NotifyLevel, Notifier};
pub use watch_set::WatchSet;
