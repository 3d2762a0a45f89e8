//! Watcher backend selection

use std::time::Duration;

use notify::{Config, EventHandler, EventKind, PollWatcher, RecommendedWatcher, Watcher};

/// Default polling interval when `--poll` is given without `--interval`
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

pub type BoxedWatcher = Box<dyn Watcher + Send>;

/// Which notify backend a watcher runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchBackend {
    /// inotify / FSEvents / ReadDirectoryChanges
    Native,
    /// stat polling at the given interval
    Poll(Duration),
}

impl WatchBackend {
    pub fn is_polling(&self) -> bool {
        matches!(self, WatchBackend::Poll(_))
    }
}

pub fn create_watcher<F: EventHandler>(backend: WatchBackend, handler: F) -> notify::Result<BoxedWatcher> {
    match backend {
        WatchBackend::Native => Ok(Box::new(RecommendedWatcher::new(handler, Config::default())?)),
        WatchBackend::Poll(interval) => Ok(Box::new(PollWatcher::new(
            handler,
            Config::default().with_poll_interval(interval),
        )?)),
    }
}

/// Whether an event kind can mean the file's content changed
pub fn is_change(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn access_events_are_not_changes() {
        assert!(!is_change(&EventKind::Access(AccessKind::Any)));
        assert!(is_change(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_change(&EventKind::Create(CreateKind::File)));
    }

    #[test]
    fn poll_backend_reports_polling() {
        assert!(WatchBackend::Poll(DEFAULT_POLL_INTERVAL).is_polling());
        assert!(!WatchBackend::Native.is_polling());
    }
}
