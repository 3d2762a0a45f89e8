//! Compilation service port
//!
//! The supervisor never compiles anything itself; it relays requests to a
//! service that does, and tells that service which files changed.

use std::ffi::OsString;
use std::path::Path;

use crate::domain::entities::CompileRequest;

pub trait CompilationService {
    /// (Re)initialize the service, dropping anything derived from the old build config
    fn init(&mut self);

    /// Compile one requested file
    fn compile(&mut self, request: &CompileRequest);

    /// Recompile outputs derived from `path` (no-op for non-source files)
    fn compile_changed(&mut self, path: &Path);

    /// Build configuration file whose change requires `init()`
    fn build_config_path(&self) -> Option<&Path>;

    /// Module the child loads before the script to install compile hooks
    fn child_hook_path(&self) -> Option<&Path>;

    /// Side-channel file the child writes compile requests into
    fn compile_request_file(&self) -> &Path;

    /// Signal the child that compile hooks can be served
    fn write_ready_file(&self);

    /// Environment the child needs to find the service
    fn child_env(&self) -> Vec<(OsString, OsString)>;
}
