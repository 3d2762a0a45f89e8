//! Compilation service backed by an external command
//!
//! hotrun does not transpile anything itself. Each forwarded request runs
//! `command... <compile> <compiled_path>`; without a command the requests are
//! only logged. The cache directory holds the compile request side-channel
//! file and the ready marker the child's hook waits for.

use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::domain::entities::CompileRequest;
use crate::domain::ports::CompilationService;
use crate::domain::services::SOURCE_EXTENSIONS;
use crate::error::HotrunResult;

pub const COMPILE_REQUEST_ENV: &str = "HOTRUN_COMPILE_REQUEST";
pub const READY_FILE_ENV: &str = "HOTRUN_READY_FILE";
pub const CACHE_DIR_ENV: &str = "HOTRUN_CACHE_DIR";

const REQUEST_FILE_NAME: &str = "compile-request";
const READY_FILE_NAME: &str = "ready";

pub struct CommandCompiler {
    _temp: Option<TempDir>,
    cache_dir: PathBuf,
    request_file: PathBuf,
    ready_file: PathBuf,
    command: Vec<String>,
    build_config: Option<PathBuf>,
    hook: Option<PathBuf>,
    /// source file -> destinations produced from it
    outputs: HashMap<PathBuf, BTreeSet<String>>,
}

impl CommandCompiler {
    /// Use `cache_dir`, or a fresh temporary directory removed on drop
    pub fn new(cache_dir: Option<PathBuf>) -> HotrunResult<Self> {
        let (temp, cache_dir) = match cache_dir {
            Some(dir) => {
                fs::create_dir_all(&dir)?;
                (None, dir)
            }
            None => {
                let temp = tempfile::Builder::new().prefix("hotrun-").tempdir()?;
                let dir = temp.path().to_path_buf();
                (Some(temp), dir)
            }
        };
        debug!(path = %cache_dir.display(), "Compiler cache directory");

        Ok(Self {
            _temp: temp,
            request_file: cache_dir.join(REQUEST_FILE_NAME),
            ready_file: cache_dir.join(READY_FILE_NAME),
            cache_dir,
            command: Vec::new(),
            build_config: None,
            hook: None,
            outputs: HashMap::new(),
        })
    }

    /// External command run for every request (empty = log only)
    pub fn with_command(mut self, command: Vec<String>) -> Self {
        self.command = command;
        self
    }

    pub fn with_build_config(mut self, path: Option<PathBuf>) -> Self {
        self.build_config = path.map(|p| fs::canonicalize(&p).unwrap_or(p));
        self
    }

    pub fn with_hook(mut self, hook: Option<PathBuf>) -> Self {
        self.hook = hook;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn ready_file(&self) -> &Path {
        &self.ready_file
    }

    fn run(&self, compile: &str, compiled_path: &str) {
        let Some((program, args)) = self.command.split_first() else {
            debug!(compile, compiled_path, "Compile request (no compiler command)");
            return;
        };

        debug!(compile, compiled_path, "Running {}", program);
        match Command::new(program)
            .args(args)
            .arg(compile)
            .arg(compiled_path)
            .status()
        {
            Ok(status) if status.success() => {}
            Ok(status) => error!(compile, "Compiler exited with {}", status),
            Err(e) => error!(compile, "Could not run compiler '{}': {}", program, e),
        }
    }
}

fn source_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
}

impl CompilationService for CommandCompiler {
    fn init(&mut self) {
        info!("Reinitializing compiler");
        self.outputs.clear();
    }

    fn compile(&mut self, request: &CompileRequest) {
        if !request.compile.is_empty() {
            self.outputs
                .entry(source_key(Path::new(&request.compile)))
                .or_default()
                .insert(request.compiled_path.clone());
        }
        self.run(&request.compile, &request.compiled_path);
    }

    fn compile_changed(&mut self, path: &Path) {
        if !is_source(path) {
            return;
        }
        let Some(outputs) = self.outputs.get(&source_key(path)) else {
            return;
        };
        let compile = path.to_string_lossy();
        for compiled_path in outputs {
            self.run(&compile, compiled_path);
        }
    }

    fn build_config_path(&self) -> Option<&Path> {
        self.build_config.as_deref()
    }

    fn child_hook_path(&self) -> Option<&Path> {
        self.hook.as_deref()
    }

    fn compile_request_file(&self) -> &Path {
        &self.request_file
    }

    fn write_ready_file(&self) {
        if let Err(e) = fs::write(&self.ready_file, "") {
            warn!(path = %self.ready_file.display(), "Could not write ready file: {}", e);
        }
    }

    fn child_env(&self) -> Vec<(OsString, OsString)> {
        vec![
            (
                COMPILE_REQUEST_ENV.into(),
                self.request_file.clone().into_os_string(),
            ),
            (READY_FILE_ENV.into(), self.ready_file.clone().into_os_string()),
            (CACHE_DIR_ENV.into(), self.cache_dir.clone().into_os_string()),
        ]
    }
}
