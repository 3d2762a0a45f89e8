//! Restart coordinator
//!
//! Serializes restart triggers (file changes, `rs`, child errors) into a single
//! stop/start sequence so that at most one child is alive at any time.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::entities::{Phase, SupervisorState};
use crate::domain::ports::{ChildLauncher, CompilationService, NotifyLevel, Notifier, WatchSet};
use crate::error::HotrunResult;

use super::controller::{ChildCommand, ChildController, ExitOutcome};
use super::debounce::Debouncer;
use super::event::{Flow, RestartTrigger, SupervisorEvent};
use super::relay::CompileRelay;
use super::router::MessageRouter;

/// How often the dispatcher wakes up to flush debounced changes
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Coordinator behaviour that is not owned by a collaborator
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Extra paths watched for every child generation
    pub extra_watches: Vec<PathBuf>,
    /// Clear the terminal before each restart
    pub clear_screen: bool,
    /// Quiet period before a file change restarts the child
    pub debounce: Duration,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            extra_watches: Vec::new(),
            clear_screen: false,
            debounce: Duration::from_millis(super::debounce::DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// Supervisor - the restart coordinator and event dispatcher
///
/// Parameterized by its ports so every transition can be driven in tests
/// without spawning processes or touching watchers.
pub struct Supervisor<L, W, C, N>
where
    L: ChildLauncher,
    W: WatchSet,
    C: CompilationService,
    N: Notifier,
{
    state: SupervisorState,
    controller: ChildController<L>,
    command: ChildCommand,
    watch_set: W,
    compiler: C,
    notifier: N,
    router: MessageRouter,
    relay: CompileRelay,
    debouncer: Debouncer,
    options: SupervisorOptions,
}

impl<L, W, C, N> Supervisor<L, W, C, N>
where
    L: ChildLauncher,
    W: WatchSet,
    C: CompilationService,
    N: Notifier,
{
    pub fn new(
        controller: ChildController<L>,
        command: ChildCommand,
        watch_set: W,
        compiler: C,
        notifier: N,
        router: MessageRouter,
        options: SupervisorOptions,
    ) -> Self {
        Self {
            state: SupervisorState::new(),
            controller,
            command,
            watch_set,
            compiler,
            notifier,
            router,
            relay: CompileRelay::new(),
            debouncer: Debouncer::new(options.debounce),
            options,
        }
    }

    pub fn state(&self) -> &SupervisorState {
        &self.state
    }

    pub fn controller(&self) -> &ChildController<L> {
        &self.controller
    }

    pub fn watch_set(&self) -> &W {
        &self.watch_set
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Spawn the next child generation
    pub fn start(&mut self) -> HotrunResult<u64> {
        for path in &self.options.extra_watches {
            self.watch_set.add(path);
        }
        if let Some(build_config) = self.compiler.build_config_path() {
            self.watch_set.add(build_config);
        }

        let request_file = self.compiler.compile_request_file();
        if let Err(e) = fs::write(request_file, "") {
            warn!(path = %request_file.display(), "Could not truncate compile request file: {}", e);
        }
        self.relay.reset();

        let spec = self
            .command
            .launch_spec(self.compiler.child_hook_path(), self.compiler.child_env());
        let generation = self.controller.start(&mut self.state, &spec)?;
        self.compiler.write_ready_file();
        Ok(generation)
    }

    /// Ask the current child to stop
    pub fn stop(&mut self, will_terminate: bool) -> bool {
        self.controller.stop(&mut self.state, will_terminate)
    }

    /// Restart the child in response to `trigger`
    ///
    /// A trigger that arrives while a restart is already in progress is
    /// dropped after its notification; it is not queued.
    pub fn restart(&mut self, trigger: RestartTrigger) {
        if let RestartTrigger::File(path) = &trigger {
            if self.compiler.build_config_path() == Some(path.as_path()) {
                self.notifier.notify(
                    "Reinitializing compilation",
                    &path.display().to_string(),
                    NotifyLevel::Info,
                );
                self.compiler.init();
            }
        }

        if self.options.clear_screen {
            self.notifier.clear_screen();
        }
        self.notifier
            .notify("Restarting", &trigger.describe(), NotifyLevel::Info);

        if let RestartTrigger::File(path) = &trigger {
            self.compiler.compile_changed(path);
        }

        if self.state.is_starting() {
            debug!("Already starting");
            return;
        }

        debug!("Removing all watchers from files");
        self.watch_set.close_auxiliary();
        self.watch_set.remove_all();
        self.state.phase = Phase::Starting;

        if self.state.has_child() {
            debug!("Child is still running, restart upon exit");
            self.state.start_on_exit = true;
            self.controller.stop(&mut self.state, false);
        } else {
            debug!("Child is already stopped, probably due to a previous error");
            self.start_or_notify();
        }
    }

    fn start_or_notify(&mut self) {
        if let Err(e) = self.start() {
            self.notifier
                .notify("Failed to start", &e.to_string(), NotifyLevel::Error);
        }
    }

    /// Handle one event; the only place supervisor state changes
    pub fn handle(&mut self, event: SupervisorEvent) -> Flow {
        match event {
            SupervisorEvent::FileChanged(path) => {
                if self.debouncer.is_immediate() {
                    self.restart(RestartTrigger::File(path));
                } else {
                    self.debouncer.add_change(path);
                }
            }
            SupervisorEvent::AuxiliaryChanged(path) => self.restart(RestartTrigger::File(path)),
            SupervisorEvent::WatchFallback { limit } => {
                warn!("hotrun ran out of file handles after watching {} files.", limit);
                warn!("Falling back to polling which uses more CPU.");
                info!("Run ulimit -n 10000 to increase the file descriptor limit.");
                if self.router.filter().limit().watches_dependencies() {
                    info!("... or add `--no-deps` to use less file handles.");
                }
            }
            SupervisorEvent::ManualRestart => {
                debug!("User entered `rs`");
                self.restart(RestartTrigger::Manual);
            }
            SupervisorEvent::ChildConnected { generation } => {
                self.controller.on_connected(&mut self.state, generation);
            }
            SupervisorEvent::ChildDisconnected { generation } => {
                self.controller.on_disconnected(&mut self.state, generation);
            }
            SupervisorEvent::ChildRequired { generation, path } => {
                if self.state.live_child(generation).is_some() {
                    self.router.on_required(&path, &mut self.watch_set);
                }
            }
            SupervisorEvent::ChildError { generation, error } => {
                if self.state.live_child(generation).is_some() {
                    let request = self
                        .router
                        .on_error(&error, &mut self.watch_set, &self.notifier);
                    self.controller
                        .stop(&mut self.state, request.will_terminate);
                }
            }
            SupervisorEvent::CompileRequest {
                generation,
                request,
            } => {
                if self.state.live_child(generation).is_some() {
                    self.relay.on_message(&request, &mut self.compiler);
                }
            }
            SupervisorEvent::CompileRequestFileChanged(path) => {
                self.relay.on_request_file(&path, &mut self.compiler);
            }
            SupervisorEvent::ChildExited { generation, code } => {
                match self.controller.on_exit(&mut self.state, generation, code) {
                    ExitOutcome::Stale => {}
                    ExitOutcome::Respawn => {
                        if self.state.start_on_exit {
                            self.start_or_notify();
                        } else {
                            info!(code, "Child exited, waiting for changes before restart");
                        }
                    }
                    ExitOutcome::Terminate(code) => return Flow::Exit(code),
                }
            }
            SupervisorEvent::Signal => {
                debug!("Process got termination signal");
                self.controller.kill(&self.state);
                return Flow::Exit(0);
            }
        }
        Flow::Continue
    }

    /// Restart for every debounced change that has become ready
    pub fn flush_debounced(&mut self) {
        for path in self.debouncer.take_ready() {
            self.restart(RestartTrigger::File(path));
        }
    }

    /// Dispatch events until the supervisor should exit; returns the exit code
    pub fn run(&mut self, events: &Receiver<SupervisorEvent>) -> i32 {
        loop {
            match events.recv_timeout(POLL_INTERVAL) {
                Ok(event) => {
                    if let Flow::Exit(code) = self.handle(event) {
                        return code;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("All event sources closed");
                    return 0;
                }
            }
            self.flush_debounced();
        }
    }
}
