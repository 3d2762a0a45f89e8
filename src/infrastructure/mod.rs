//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process/` - Child processes and the loopback IPC channel
//! - `watch/` - notify-backed watch set and compile request file watch
//! - `notifier/` - Console and JSON notifiers
//! - `compiler` - External compile command
//! - `input` - `rs` on stdin

pub mod compiler;
pub mod input;
pub mod notifier;
pub mod process;
pub mod watch;

// Re-export for convenience
pub use compiler::CommandCompiler;
pub use notifier::{ConsoleNotifier, JsonNotifier};
pub use process::ProcessLauncher;
pub use watch::{NotifyWatchSet, RequestFileWatch, WatchBackend};
