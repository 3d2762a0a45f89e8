//! JSON notifications
//!
//! Writes notifications as NDJSON for editors and scripts driving hotrun.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{NotifyLevel, Notifier};

/// Notifier that outputs one JSON object per line
pub struct JsonNotifier {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonNotifier {
    /// Create a JSON notifier writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON notifier writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl Notifier for JsonNotifier {
    fn notify(&self, title: &str, message: &str, level: NotifyLevel) {
        self.write_event(serde_json::json!({
            "event": "notify",
            "level": level.as_str(),
            "title": title,
            "message": message,
        }));
    }

    fn clear_screen(&self) {
        self.write_event(serde_json::json!({ "event": "clear" }));
    }
}
