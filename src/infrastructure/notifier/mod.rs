//! Notifier implementations
//!
//! - ConsoleNotifier: timestamped terminal lines
//! - JsonNotifier: NDJSON output for tooling

mod console;
mod json;

pub use console::{render_line, stdout_supports_color, ConsoleNotifier};
pub use json::JsonNotifier;
