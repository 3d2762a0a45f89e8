//! Domain Entities
//!
//! - `ChildHandle` - The single supervised child process
//! - `SupervisorState` - Restart serialization state
//! - `ChildMessage` - Messages the child sends over its IPC channel

mod child;
mod message;
mod state;

pub use child::ChildHandle;
pub use message::{ChildError, ChildMessage, CompileRequest, LastRequire, RequiredModule};
pub use state::{Phase, SupervisorState};
