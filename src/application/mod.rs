//! Application Layer
//!
//! Use cases that orchestrate the supervision flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Supervisor` - Restart coordinator driving one child through its lifecycle

pub mod supervisor;

pub use supervisor::{
    ChildCommand, ChildController, CompileRelay, Debouncer, ExitOutcome, Flow, MessageRouter,
    RestartTrigger, Supervisor, SupervisorEvent, SupervisorOptions, DEFAULT_DEBOUNCE_MS,
};
