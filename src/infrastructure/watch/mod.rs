//! File watching on top of `notify`

mod backend;
mod request_file;
mod watch_set;

pub use backend::{WatchBackend, DEFAULT_POLL_INTERVAL};
pub use request_file::RequestFileWatch;
pub use watch_set::NotifyWatchSet;
