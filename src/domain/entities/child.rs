//! Child handle
//!
//! Tracks the one live child process. Transition rules:
//!
//! - `connected`: `None` until the child's IPC channel connects, `Some(true)` while it
//!   is live, `Some(false)` once either side closed it
//! - `stopping`: set once by the first stop request, never cleared
//! - `respawn`: set when the supervisor asks the child to stop (or preset by the
//!   `respawn` option); an exit with `respawn` unset ends the supervisor

/// Identity and lifecycle flags of the running child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildHandle {
    /// Sequence number of this spawn; events from older generations are stale
    pub generation: u64,
    pub pid: u32,
    pub connected: Option<bool>,
    pub stopping: bool,
    pub respawn: bool,
}

impl ChildHandle {
    pub fn new(generation: u64, pid: u32) -> Self {
        Self {
            generation,
            pid,
            connected: None,
            stopping: false,
            respawn: false,
        }
    }

    /// Preset the respawn flag (the child may exit without ending the supervisor)
    pub fn with_respawn(mut self, respawn: bool) -> Self {
        self.respawn = respawn;
        self
    }

    /// True unless the IPC channel is known to be closed
    pub fn may_be_connected(&self) -> bool {
        self.connected != Some(false)
    }

    /// Mark the child as stopping; returns false if it already was
    pub fn begin_stop(&mut self) -> bool {
        if self.stopping {
            return false;
        }
        self.stopping = true;
        self.respawn = true;
        true
    }
}
