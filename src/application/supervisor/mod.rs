//! Supervisor Use Case
//!
//! Runs one child process at a time and restarts it when its dependencies change.
//! It orchestrates:
//! - Child lifecycle (spawn, stop, exit propagation)
//! - Restart serialization (`Idle` / `Starting`)
//! - Debouncing of file change events
//! - Child IPC messages (required files, errors, compile requests)
//!
//! ## Architecture
//!
//! Every source of activity (file watchers, the child's IPC channel, its exit,
//! console input, signals) sends a `SupervisorEvent` into one channel. A single
//! dispatcher owns all state and handles events one at a time:
//! - `Supervisor` - Main orchestrator and dispatcher
//! - `ChildController` - Spawn/stop/exit handling for the child
//! - `MessageRouter` - Routes `required` and `error` messages
//! - `CompileRelay` - Deduplicates compile requests per delivery channel
//!
//! ## Usage
//!
//! ```ignore
//! let (tx, rx) = std::sync::mpsc::channel();
//! let mut supervisor = Supervisor::new(controller, command, watch_set, compiler, notifier, router, options);
//! supervisor.start()?;
//! let code = supervisor.run(&rx);
//! ```

mod controller;
mod coordinator;
mod debounce;
mod event;
mod relay;
mod router;


pub use controller::{ChildCommand, ChildController, ExitOutcome};
pub use coordinator::{Supervisor, SupervisorOptions};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
pub use event::{Flow, RestartTrigger, SupervisorEvent};
pub use relay::{parse_request_file, CompileRelay};
pub use router::{MessageRouter, StopRequest};
