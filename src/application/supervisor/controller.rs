//! Child process controller
//!
//! Owns spawn, stop and exit handling for the single child. Whether an exit
//! was requested by the supervisor is decided purely by the child's `respawn`
//! flag, never by its exit code.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::{ChildHandle, Phase, SupervisorState};
use crate::domain::ports::{ChildLauncher, LaunchSpec};
use crate::error::{HotrunError, HotrunResult};

/// Command line template for every child generation
///
/// The argument vector is
/// `prior_args + [hook_flag, hook] + runtime_args + [wrapper] + script + script_args`.
#[derive(Debug, Clone)]
pub struct ChildCommand {
    pub runtime: OsString,
    pub prior_args: Vec<OsString>,
    pub hook_flag: OsString,
    pub runtime_args: Vec<OsString>,
    pub wrapper: Option<PathBuf>,
    pub script: PathBuf,
    pub script_args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl ChildCommand {
    pub fn new(runtime: impl Into<OsString>, script: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            prior_args: Vec::new(),
            hook_flag: OsString::from("-r"),
            runtime_args: Vec::new(),
            wrapper: None,
            script: script.into(),
            script_args: Vec::new(),
            cwd: PathBuf::from("."),
        }
    }

    pub fn with_script_args(mut self, args: Vec<OsString>) -> Self {
        self.script_args = args;
        self
    }

    pub fn with_runtime_args(mut self, args: Vec<OsString>) -> Self {
        self.runtime_args = args;
        self
    }

    pub fn with_prior_args(mut self, args: Vec<OsString>) -> Self {
        self.prior_args = args;
        self
    }

    pub fn with_hook_flag(mut self, flag: impl Into<OsString>) -> Self {
        self.hook_flag = flag.into();
        self
    }

    pub fn with_wrapper(mut self, wrapper: Option<PathBuf>) -> Self {
        self.wrapper = wrapper;
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Build the launch spec, injecting the compile hook module if there is one
    pub fn launch_spec(&self, hook: Option<&Path>, env: Vec<(OsString, OsString)>) -> LaunchSpec {
        let mut args = self.prior_args.clone();
        if let Some(hook) = hook {
            args.push(self.hook_flag.clone());
            args.push(hook.as_os_str().to_owned());
        }
        args.extend(self.runtime_args.iter().cloned());
        if let Some(wrapper) = &self.wrapper {
            args.push(wrapper.as_os_str().to_owned());
        }
        args.push(self.script.as_os_str().to_owned());
        args.extend(self.script_args.iter().cloned());

        LaunchSpec {
            program: self.runtime.clone(),
            args,
            env,
            cwd: self.cwd.clone(),
        }
    }
}

/// What a child exit means for the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit of a child that is no longer current
    Stale,
    /// The supervisor asked for this exit; the handle was cleared
    Respawn,
    /// The child finished on its own; the supervisor exits with this code
    Terminate(i32),
}

/// Spawns, stops and reaps the child through a `ChildLauncher`
pub struct ChildController<L: ChildLauncher> {
    launcher: L,
    tree_kill: bool,
    respawn: bool,
}

impl<L: ChildLauncher> ChildController<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            tree_kill: false,
            respawn: false,
        }
    }

    /// Signal the child's whole process tree instead of the child alone
    pub fn with_tree_kill(mut self, tree_kill: bool) -> Self {
        self.tree_kill = tree_kill;
        self
    }

    /// Keep the supervisor running when the child exits on its own
    pub fn with_respawn(mut self, respawn: bool) -> Self {
        self.respawn = respawn;
        self
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Spawn exactly one child and leave the `Starting` phase
    pub fn start(&mut self, state: &mut SupervisorState, spec: &LaunchSpec) -> HotrunResult<u64> {
        if let Some(child) = &state.child {
            warn!(pid = child.pid, "Refusing to start a second child");
            return Ok(child.generation);
        }

        let generation = state.next_generation();
        debug!(generation, "Starting child process {}", spec.display_command());

        let result = self.launcher.launch(spec, generation);
        state.phase = Phase::Idle;
        state.start_on_exit = false;

        let pid = result.map_err(|source| HotrunError::Spawn {
            program: spec.program.to_string_lossy().into_owned(),
            source,
        })?;
        state.child = Some(ChildHandle::new(generation, pid).with_respawn(self.respawn));
        Ok(generation)
    }

    /// Ask the child to stop; only the first call per child has an effect
    pub fn stop(&mut self, state: &mut SupervisorState, will_terminate: bool) -> bool {
        let Some(child) = state.child.as_mut() else {
            return false;
        };
        if !child.begin_stop() {
            return false;
        }

        if child.may_be_connected() {
            debug!(pid = child.pid, "Disconnecting from child");
            self.launcher.disconnect(child.generation);
            child.connected = Some(false);
            if !will_terminate {
                debug!(pid = child.pid, tree = self.tree_kill, "Sending SIGTERM to child");
                self.launcher.terminate(child.generation, self.tree_kill);
            }
        }
        true
    }

    /// Terminate the child without waiting for it (supervisor shutdown)
    pub fn kill(&mut self, state: &SupervisorState) {
        if let Some(child) = &state.child {
            debug!(pid = child.pid, tree = self.tree_kill, "Sending SIGTERM to child");
            self.launcher.terminate(child.generation, self.tree_kill);
        }
    }

    pub fn on_connected(&mut self, state: &mut SupervisorState, generation: u64) {
        if let Some(child) = state.child_mut(generation) {
            if child.connected.is_none() {
                child.connected = Some(true);
            }
        }
    }

    pub fn on_disconnected(&mut self, state: &mut SupervisorState, generation: u64) {
        if let Some(child) = state.child_mut(generation) {
            child.connected = Some(false);
        }
    }

    pub fn on_exit(&mut self, state: &mut SupervisorState, generation: u64, code: i32) -> ExitOutcome {
        debug!(generation, code, "Child exited");
        let Some(child) = state.child_mut(generation) else {
            return ExitOutcome::Stale;
        };
        if !child.respawn {
            return ExitOutcome::Terminate(code);
        }
        state.child = None;
        ExitOutcome::Respawn
    }
}
