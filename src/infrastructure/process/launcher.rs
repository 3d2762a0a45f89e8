//! OS process launcher
//!
//! Each launched child gets its own IPC channel and a waiter thread that
//! reports the exit as `SupervisorEvent::ChildExited`. The exit is reported
//! only after the channel has delivered everything the child wrote, so a
//! final `error` message is always handled before the exit.

use std::collections::HashMap;
use std::io;
use std::process::{Child, Command, ExitStatus};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::SupervisorEvent;
use crate::domain::ports::{ChildLauncher, LaunchSpec};

use super::ipc::{IpcChannel, IpcDrain, IPC_ENV};

const WAIT_POLL: Duration = Duration::from_millis(50);
/// Upper bound on waiting for the IPC reader once the child has exited
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

struct RunningChild {
    child: Arc<Mutex<Child>>,
    ipc: IpcChannel,
    pid: u32,
}

impl RunningChild {
    fn has_exited(&self) -> bool {
        match self.child.lock() {
            Ok(mut child) => !matches!(child.try_wait(), Ok(None)),
            Err(_) => true,
        }
    }
}

/// Launches children as OS processes
pub struct ProcessLauncher {
    events: Sender<SupervisorEvent>,
    process_groups: bool,
    children: HashMap<u64, RunningChild>,
}

impl ProcessLauncher {
    pub fn new(events: Sender<SupervisorEvent>) -> Self {
        Self {
            events,
            process_groups: false,
            children: HashMap::new(),
        }
    }

    /// Start every child in its own process group so the whole tree can be signalled
    pub fn with_process_groups(mut self, enabled: bool) -> Self {
        self.process_groups = enabled;
        self
    }

    fn build_command(&self, spec: &LaunchSpec, ipc: &IpcChannel) -> Command {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k, v)))
            .env(IPC_ENV, ipc.address().to_string())
            .current_dir(&spec.cwd);

        #[cfg(unix)]
        if self.process_groups {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        command
    }
}

impl ChildLauncher for ProcessLauncher {
    fn launch(&mut self, spec: &LaunchSpec, generation: u64) -> io::Result<u32> {
        self.children.retain(|_, running| !running.has_exited());

        let (ipc, drain) = IpcChannel::bind(generation, self.events.clone())?;
        let child = self.build_command(spec, &ipc).spawn()?;
        let pid = child.id();
        info!(pid, generation, "Spawned {}", spec.display_command());

        let child = Arc::new(Mutex::new(child));
        spawn_waiter(generation, Arc::clone(&child), drain, self.events.clone())?;

        self.children.insert(generation, RunningChild { child, ipc, pid });
        Ok(pid)
    }

    fn disconnect(&mut self, generation: u64) {
        if let Some(running) = self.children.get(&generation) {
            running.ipc.disconnect();
        }
    }

    fn terminate(&mut self, generation: u64, tree: bool) {
        let Some(running) = self.children.get(&generation) else {
            return;
        };
        if let Err(e) = send_terminate(running, tree) {
            // the child may already be gone
            debug!(pid = running.pid, "Could not signal child: {}", e);
        }
    }
}

#[cfg(unix)]
fn send_terminate(running: &RunningChild, tree: bool) -> io::Result<()> {
    let pid = i32::try_from(running.pid).map_err(io::Error::other)?;
    let target = if tree { -pid } else { pid };
    // SAFETY: kill(2) has no memory safety preconditions
    let rc = unsafe { libc::kill(target, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn send_terminate(running: &RunningChild, _tree: bool) -> io::Result<()> {
    let mut child = running
        .child
        .lock()
        .map_err(|_| io::Error::other("child lock poisoned"))?;
    child.kill()
}

fn spawn_waiter(
    generation: u64,
    child: Arc<Mutex<Child>>,
    drain: IpcDrain,
    events: Sender<SupervisorEvent>,
) -> io::Result<()> {
    thread::Builder::new()
        .name(format!("hotrun-wait-{generation}"))
        .spawn(move || {
            let code = loop {
                let status = match child.lock() {
                    Ok(mut child) => child.try_wait(),
                    Err(_) => return,
                };
                match status {
                    Ok(Some(status)) => break exit_code(status),
                    Ok(None) => thread::sleep(WAIT_POLL),
                    Err(e) => {
                        warn!(generation, "Failed to wait for child: {}", e);
                        break 1;
                    }
                }
            };
            if !drain.wait(DRAIN_TIMEOUT) {
                debug!(generation, "IPC connection still open after child exit");
            }
            let _ = events.send(SupervisorEvent::ChildExited { generation, code });
        })?;
    Ok(())
}

/// Exit code of a finished child; signals map to `128 + signo` on unix
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
