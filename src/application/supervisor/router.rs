//! IPC message router
//!
//! Turns `required` messages into watch set entries and `error` messages into
//! notifications, auxiliary watches and a stop request.

use tracing::{debug, trace};

use crate::domain::entities::ChildError;
use crate::domain::ports::{NotifyLevel, Notifier, WatchSet};
use crate::domain::services::{candidate_sources, DependencyFilter};

/// Stop the child after it reported an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopRequest {
    /// The child exits by itself; only disconnect it
    pub will_terminate: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MessageRouter {
    filter: DependencyFilter,
}

impl MessageRouter {
    pub fn new(filter: DependencyFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &DependencyFilter {
        &self.filter
    }

    /// Watch a file the child required, if the dependency filter accepts it
    pub fn on_required<W: WatchSet>(&self, path: &str, watch_set: &mut W) -> bool {
        if !self.filter.should_watch(path) {
            trace!(path, "Not watching required file");
            return false;
        }
        watch_set.add(std::path::Path::new(path));
        true
    }

    /// Handle an error reported by the child
    pub fn on_error<W: WatchSet, N: Notifier>(
        &self,
        error: &ChildError,
        watch_set: &mut W,
        notifier: &N,
    ) -> StopRequest {
        debug!(code = ?error.code, will_terminate = error.will_terminate, "Child error");

        if let Some(candidates) = candidate_sources(error) {
            for candidate in &candidates {
                debug!(path = %candidate.display(), "Watching for missing module");
                watch_set.add_auxiliary(candidate);
            }
        }

        notifier.notify(error.title(), &error.message, NotifyLevel::Error);
        StopRequest {
            will_terminate: error.will_terminate,
        }
    }
}
