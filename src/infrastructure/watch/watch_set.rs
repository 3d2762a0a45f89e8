//! notify-backed watch set
//!
//! Files are watched through their parent directory (non-recursive) and
//! events are filtered against the set, so one directory watch serves every
//! watched file inside it. Directories added explicitly (`--watch src`) are
//! watched recursively.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{Event, RecursiveMode};
use tracing::{debug, trace, warn};

use crate::application::SupervisorEvent;
use crate::domain::ports::WatchSet;
use crate::error::HotrunResult;

use super::backend::{create_watcher, is_change, BoxedWatcher, WatchBackend, DEFAULT_POLL_INTERVAL};

#[derive(Debug, Default)]
struct Targets {
    files: HashSet<PathBuf>,
    trees: HashSet<PathBuf>,
}

impl Targets {
    fn matches(&self, path: &Path) -> bool {
        self.files.contains(path) || self.trees.iter().any(|root| path.starts_with(root))
    }

    fn len(&self) -> usize {
        self.files.len() + self.trees.len()
    }
}

/// Watch on the parent directory of not-yet-existing files
struct AuxiliaryWatch {
    _watcher: BoxedWatcher,
}

pub struct NotifyWatchSet {
    events: Sender<SupervisorEvent>,
    backend: WatchBackend,
    poll_interval: Duration,
    watcher: BoxedWatcher,
    targets: Arc<Mutex<Targets>>,
    /// watched parent directory -> number of files in it
    directories: HashMap<PathBuf, usize>,
    auxiliary: Vec<AuxiliaryWatch>,
}

impl NotifyWatchSet {
    pub fn new(events: Sender<SupervisorEvent>, backend: WatchBackend) -> HotrunResult<Self> {
        let targets = Arc::new(Mutex::new(Targets::default()));
        let watcher = main_watcher(backend, Arc::clone(&targets), events.clone())?;
        let poll_interval = match backend {
            WatchBackend::Poll(interval) => interval,
            WatchBackend::Native => DEFAULT_POLL_INTERVAL,
        };
        Ok(Self {
            events,
            backend,
            poll_interval,
            watcher,
            targets,
            directories: HashMap::new(),
            auxiliary: Vec::new(),
        })
    }

    /// Interval used if the set has to fall back to polling
    pub fn with_fallback_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Number of files and directory trees currently watched
    pub fn len(&self) -> usize {
        self.targets.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn auxiliary_count(&self) -> usize {
        self.auxiliary.len()
    }

    fn watch(&mut self, path: &Path, mode: RecursiveMode) {
        match self.watcher.watch(path, mode) {
            Ok(()) => {}
            Err(e) if matches!(e.kind, notify::ErrorKind::MaxFilesWatch) => self.fall_back(),
            Err(e) => warn!(path = %path.display(), "Could not watch: {}", e),
        }
    }

    /// Rebuild the set on the polling backend after running out of handles
    fn fall_back(&mut self) {
        if self.backend.is_polling() {
            warn!("Polling watcher hit its watch limit");
            return;
        }
        let backend = WatchBackend::Poll(self.poll_interval);
        let watcher = match main_watcher(backend, Arc::clone(&self.targets), self.events.clone()) {
            Ok(watcher) => watcher,
            Err(e) => {
                warn!("Could not create polling watcher: {}", e);
                return;
            }
        };
        self.watcher = watcher;
        self.backend = backend;

        for dir in self.directories.keys() {
            if let Err(e) = self.watcher.watch(dir, RecursiveMode::NonRecursive) {
                warn!(path = %dir.display(), "Could not watch: {}", e);
            }
        }
        let trees: Vec<PathBuf> = self
            .targets
            .lock()
            .map(|t| t.trees.iter().cloned().collect())
            .unwrap_or_default();
        for root in &trees {
            if let Err(e) = self.watcher.watch(root, RecursiveMode::Recursive) {
                warn!(path = %root.display(), "Could not watch: {}", e);
            }
        }

        let _ = self
            .events
            .send(SupervisorEvent::WatchFallback { limit: self.len() });
    }
}

impl WatchSet for NotifyWatchSet {
    fn add(&mut self, path: &Path) {
        let canonical = match fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!(path = %path.display(), "Not watching: {}", e);
                return;
            }
        };

        let is_dir = canonical.is_dir();
        {
            let Ok(mut targets) = self.targets.lock() else {
                return;
            };
            let inserted = if is_dir {
                targets.trees.insert(canonical.clone())
            } else {
                targets.files.insert(canonical.clone())
            };
            if !inserted {
                return;
            }
        }
        trace!(path = %canonical.display(), "Watching");

        if is_dir {
            self.watch(&canonical, RecursiveMode::Recursive);
            return;
        }
        let Some(dir) = canonical.parent().map(Path::to_path_buf) else {
            return;
        };
        let count = self.directories.entry(dir.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.watch(&dir, RecursiveMode::NonRecursive);
        }
    }

    fn remove_all(&mut self) {
        for dir in self.directories.keys() {
            let _ = self.watcher.unwatch(dir);
        }
        self.directories.clear();
        if let Ok(mut targets) = self.targets.lock() {
            for root in &targets.trees {
                let _ = self.watcher.unwatch(root);
            }
            targets.files.clear();
            targets.trees.clear();
        }
    }

    fn add_auxiliary(&mut self, path: &Path) {
        let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        if !dir.is_dir() {
            debug!(path = %path.display(), "Parent directory missing, not watching");
            return;
        }

        let name = name.to_os_string();
        let candidate = path.to_path_buf();
        let events = self.events.clone();
        let handler = move |res: notify::Result<Event>| match res {
            Ok(event) if is_change(&event.kind) => {
                if event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(name.as_os_str()))
                {
                    let _ = events.send(SupervisorEvent::AuxiliaryChanged(candidate.clone()));
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watch error: {}", e),
        };

        let mut watcher = match create_watcher(self.backend, handler) {
            Ok(watcher) => watcher,
            Err(e) => {
                warn!(path = %path.display(), "Could not create watcher: {}", e);
                return;
            }
        };
        if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            warn!(path = %dir.display(), "Could not watch: {}", e);
            return;
        }
        self.auxiliary.push(AuxiliaryWatch { _watcher: watcher });
    }

    fn close_auxiliary(&mut self) {
        self.auxiliary.clear();
    }
}

fn main_watcher(
    backend: WatchBackend,
    targets: Arc<Mutex<Targets>>,
    events: Sender<SupervisorEvent>,
) -> HotrunResult<BoxedWatcher> {
    let handler = move |res: notify::Result<Event>| match res {
        Ok(event) if is_change(&event.kind) => {
            let Ok(targets) = targets.lock() else {
                return;
            };
            for path in event.paths {
                if targets.matches(&path) {
                    let _ = events.send(SupervisorEvent::FileChanged(path));
                }
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Watch error: {}", e),
    };
    Ok(create_watcher(backend, handler)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, Receiver};
    use std::thread;
    use tempfile::tempdir;

    const WAIT: Duration = Duration::from_secs(5);
    const QUIET: Duration = Duration::from_millis(300);

    fn settle() {
        thread::sleep(Duration::from_millis(100));
    }

    fn drain(rx: &Receiver<SupervisorEvent>) {
        while rx.recv_timeout(QUIET).is_ok() {}
    }

    #[test]
    fn change_to_watched_file_is_reported() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "1").unwrap();

        let (tx, rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();
        set.add(&file);
        settle();

        fs::write(&file, "2").unwrap();

        let expected = fs::canonicalize(&file).unwrap();
        assert_eq!(
            rx.recv_timeout(WAIT).unwrap(),
            SupervisorEvent::FileChanged(expected)
        );
    }

    #[test]
    fn sibling_files_are_filtered() {
        let dir = tempdir().unwrap();
        let watched = dir.path().join("a.js");
        let sibling = dir.path().join("b.js");
        fs::write(&watched, "1").unwrap();
        fs::write(&sibling, "1").unwrap();

        let (tx, rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();
        set.add(&watched);
        settle();

        fs::write(&sibling, "2").unwrap();
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn remove_all_stops_reporting() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "1").unwrap();

        let (tx, rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();
        set.add(&file);
        set.add(&file);
        assert_eq!(set.len(), 1);

        set.remove_all();
        assert!(set.is_empty());
        settle();
        drain(&rx);

        fs::write(&file, "2").unwrap();
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn missing_file_is_not_watched() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();

        set.add(&dir.path().join("missing.js"));

        assert!(set.is_empty());
    }

    #[test]
    fn watched_directory_reports_nested_changes() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let file = dir.path().join("nested").join("c.js");
        fs::write(&file, "1").unwrap();

        let (tx, rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();
        set.add(dir.path());
        settle();

        fs::write(&file, "2").unwrap();

        let event = rx.recv_timeout(WAIT).unwrap();
        assert!(matches!(event, SupervisorEvent::FileChanged(_)));
    }

    #[test]
    fn auxiliary_watch_reports_creation() {
        let dir = tempdir().unwrap();
        let candidate = dir.path().join("missing.ts");

        let (tx, rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();
        set.add_auxiliary(&candidate);
        assert_eq!(set.auxiliary_count(), 1);
        settle();

        fs::write(&candidate, "export {}").unwrap();

        assert_eq!(
            rx.recv_timeout(WAIT).unwrap(),
            SupervisorEvent::AuxiliaryChanged(candidate)
        );
    }

    #[test]
    fn close_auxiliary_drops_watches() {
        let dir = tempdir().unwrap();
        let candidate = dir.path().join("missing.tsx");

        let (tx, rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();
        set.add_auxiliary(&candidate);
        set.close_auxiliary();
        assert_eq!(set.auxiliary_count(), 0);
        settle();

        fs::write(&candidate, "export {}").unwrap();
        assert!(rx.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn auxiliary_in_missing_directory_is_skipped() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = channel();
        let mut set = NotifyWatchSet::new(tx, WatchBackend::Native).unwrap();

        set.add_auxiliary(&dir.path().join("nope").join("missing.ts"));

        assert_eq!(set.auxiliary_count(), 0);
    }

    #[test]
    fn polling_backend_reports_changes() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "1").unwrap();

        let (tx, rx) = channel();
        let mut set =
            NotifyWatchSet::new(tx, WatchBackend::Poll(Duration::from_millis(50))).unwrap();
        set.add(&file);
        thread::sleep(Duration::from_millis(200));

        fs::write(&file, "changed content").unwrap();

        let event = rx.recv_timeout(WAIT).unwrap();
        assert!(matches!(event, SupervisorEvent::FileChanged(_)));
    }
}
