//! Supervisor event types

use std::path::PathBuf;

use crate::domain::entities::{ChildError, ChildMessage, CompileRequest};

/// Everything the dispatcher reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A file in the main watch set changed (debounced before restarting)
    FileChanged(PathBuf),
    /// A file under an auxiliary watch appeared or changed
    AuxiliaryChanged(PathBuf),
    /// The watch backend ran out of handles and switched to polling
    WatchFallback { limit: usize },
    /// The user typed `rs`
    ManualRestart,
    ChildConnected { generation: u64 },
    ChildDisconnected { generation: u64 },
    ChildRequired { generation: u64, path: String },
    ChildError { generation: u64, error: ChildError },
    CompileRequest { generation: u64, request: CompileRequest },
    /// The compile request side-channel file changed
    CompileRequestFileChanged(PathBuf),
    ChildExited { generation: u64, code: i32 },
    /// Termination signal delivered to the supervisor
    Signal,
}

impl SupervisorEvent {
    /// Wrap a decoded IPC message from the child in `generation`
    pub fn from_message(generation: u64, message: ChildMessage) -> Self {
        match message {
            ChildMessage::Required(required) => SupervisorEvent::ChildRequired {
                generation,
                path: required.required,
            },
            ChildMessage::Error(error) => SupervisorEvent::ChildError { generation, error },
            ChildMessage::Compile(request) => {
                SupervisorEvent::CompileRequest { generation, request }
            }
        }
    }
}

/// What caused a restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartTrigger {
    Manual,
    File(PathBuf),
}

impl RestartTrigger {
    /// Notification body describing the trigger
    pub fn describe(&self) -> String {
        match self {
            RestartTrigger::Manual => "manual restart".to_string(),
            RestartTrigger::File(path) => format!("{} has been modified", path.display()),
        }
    }
}

/// Whether the dispatcher keeps running after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Leave the supervisor with this exit code
    Exit(i32),
}
