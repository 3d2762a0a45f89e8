//! Watch set port
//!
//! The main set holds the script's dependencies; auxiliary watches are
//! short-lived watches on files that do not exist yet. Each is cleared
//! independently by the coordinator at the start of every restart cycle.

use std::path::Path;

pub trait WatchSet {
    /// Watch `path` for changes (no-op if already watched)
    fn add(&mut self, path: &Path);

    /// Stop watching every path in the main set
    fn remove_all(&mut self);

    /// Open an auxiliary watch on `path`, which may not exist yet
    fn add_auxiliary(&mut self, path: &Path);

    /// Close every auxiliary watch
    fn close_auxiliary(&mut self);
}
