//! Child launcher port - spawning and signalling the supervised process
//!
//! A launcher reports everything that happens to a child (IPC connection,
//! messages, exit) as events tagged with the generation it was launched under.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Fully constructed command line for one child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub env: Vec<(OsString, OsString)>,
    pub cwd: PathBuf,
}

impl LaunchSpec {
    /// Program and arguments, for logging
    pub fn display_command(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Abstract process launcher
///
/// Implementations:
/// - `ProcessLauncher` - OS processes with a loopback IPC channel
/// - test fakes recording every call
pub trait ChildLauncher {
    /// Spawn a child for `generation`, returning its process id
    fn launch(&mut self, spec: &LaunchSpec, generation: u64) -> io::Result<u32>;

    /// Close the IPC channel of the child in `generation`
    fn disconnect(&mut self, generation: u64);

    /// Send a termination signal to the child in `generation`
    ///
    /// With `tree` set the signal goes to the child's whole process tree.
    fn terminate(&mut self, generation: u64, tree: bool);
}
