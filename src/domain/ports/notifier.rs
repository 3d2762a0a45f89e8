//! Notifier port - user-facing notifications

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Error,
}

impl NotifyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyLevel::Info => "info",
            NotifyLevel::Error => "error",
        }
    }
}

/// Trait for surfacing restarts and child errors to the user
///
/// Implementations can be:
/// - ConsoleNotifier: timestamped terminal lines
/// - JsonNotifier: NDJSON event stream
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, level: NotifyLevel);

    /// Clear the terminal before a restart (no-op unless the sink owns a terminal)
    fn clear_screen(&self) {}
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, title: &str, message: &str, level: NotifyLevel) {
        (**self).notify(title, message, level)
    }

    fn clear_screen(&self) {
        (**self).clear_screen()
    }
}
