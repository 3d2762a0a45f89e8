//! Child processes and their IPC channels

mod ipc;
mod launcher;

pub use ipc::{IpcChannel, IpcDrain, IPC_ENV};
pub use launcher::{exit_code, ProcessLauncher};
