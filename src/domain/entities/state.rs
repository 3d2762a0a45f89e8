//! Supervisor state
//!
//! The single authoritative record used to serialize restarts. `Starting`
//! begins when a restart cycle clears the watch set and ends when the next
//! child has been spawned; triggers arriving in between are dropped.

use super::child::ChildHandle;

/// Restart phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No restart pending
    #[default]
    Idle,
    /// A restart sequence is in progress
    Starting,
}

/// Supervisor state shared by all coordinator operations
#[derive(Debug, Default)]
pub struct SupervisorState {
    pub phase: Phase,
    pub child: Option<ChildHandle>,
    /// Start a new child once the current one has exited
    pub start_on_exit: bool,
    last_generation: u64,
}

impl SupervisorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_starting(&self) -> bool {
        self.phase == Phase::Starting
    }

    /// Allocate the generation number for the next spawn
    pub fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    /// The live child, if it belongs to `generation`
    pub fn child_mut(&mut self, generation: u64) -> Option<&mut ChildHandle> {
        self.child
            .as_mut()
            .filter(|child| child.generation == generation)
    }

    /// The child of `generation`, unless a stop has already been requested
    ///
    /// Messages a stopping child queued before its channel was disconnected
    /// must not touch the next generation's watches or compilations.
    pub fn live_child(&self, generation: u64) -> Option<&ChildHandle> {
        self.child
            .as_ref()
            .filter(|child| child.generation == generation && !child.stopping)
    }

    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_starts_idle_without_child() {
        let state = SupervisorState::new();
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.is_starting());
        assert!(!state.has_child());
        assert!(!state.start_on_exit);
    }

    #[test]
    fn generations_increase() {
        let mut state = SupervisorState::new();
        assert_eq!(state.next_generation(), 1);
        assert_eq!(state.next_generation(), 2);
    }

    #[test]
    fn child_mut_filters_stale_generation() {
        let mut state = SupervisorState::new();
        state.child = Some(ChildHandle::new(3, 100));
        assert!(state.child_mut(2).is_none());
        assert!(state.child_mut(3).is_some());
    }

    #[test]
    fn live_child_excludes_stopping_child() {
        let mut state = SupervisorState::new();
        state.child = Some(ChildHandle::new(3, 100));
        assert!(state.live_child(3).is_some());
        assert!(state.live_child(2).is_none());

        state.child.as_mut().unwrap().begin_stop();
        assert!(state.live_child(3).is_none());
        assert!(state.child_mut(3).is_some());
    }
}
