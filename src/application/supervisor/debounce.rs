//! Debouncing of file change events
//!
//! Editors often write a file several times in quick succession. Each path
//! fires once it has been quiet for the debounce window.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 10;

/// Per-path debounce state
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// True if changes fire immediately
    pub fn is_immediate(&self) -> bool {
        self.window.is_zero()
    }

    pub fn add_change(&mut self, path: PathBuf) {
        self.add_change_at(path, Instant::now());
    }

    pub fn add_change_at(&mut self, path: PathBuf, at: Instant) {
        self.pending.insert(path, at);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Remove and return every path quiet for at least the window
    pub fn take_ready(&mut self) -> Vec<PathBuf> {
        self.take_ready_at(Instant::now())
    }

    pub fn take_ready_at(&mut self, now: Instant) -> Vec<PathBuf> {
        let window = self.window;
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= window)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &ready {
            self.pending.remove(path);
        }
        ready.sort();
        ready
    }
}
