//! Compile request relay
//!
//! Compile requests reach the supervisor over two channels: the side-channel
//! file (line 1 = source indicator, line 2 = destination) and direct IPC
//! messages. Each channel remembers the last destination it forwarded and
//! drops repeats. The two memories are independent, so a request delivered
//! over both channels is compiled twice.

use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::domain::entities::CompileRequest;
use crate::domain::ports::CompilationService;

/// Parse the side-channel file content into a request
///
/// A missing second line yields an empty destination.
pub fn parse_request_file(content: &str) -> CompileRequest {
    let mut lines = content.split('\n').map(|line| line.trim_end_matches('\r'));
    let compile = lines.next().unwrap_or_default();
    let compiled_path = lines.next().unwrap_or_default();
    CompileRequest::new(compile, compiled_path)
}

#[derive(Debug, Default)]
pub struct CompileRelay {
    last_from_file: Option<String>,
    last_from_message: Option<String>,
}

impl CompileRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget both channels' history (new child generation)
    pub fn reset(&mut self) {
        self.last_from_file = None;
        self.last_from_message = None;
    }

    /// The side-channel file changed; read and forward its request
    pub fn on_request_file<C: CompilationService>(&mut self, path: &Path, compiler: &mut C) -> bool {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                error!(path = %path.display(), "Error reading compile request file: {}", e);
                return false;
            }
        };
        let request = parse_request_file(&content);
        if self.last_from_file.as_deref() == Some(request.compiled_path.as_str()) {
            return false;
        }
        self.last_from_file = Some(request.compiled_path.clone());
        if request.compiled_path.is_empty() {
            return false;
        }
        debug!(compiled = %request.compiled_path, "Compile request (file)");
        compiler.compile(&request);
        true
    }

    /// A compile request arrived as an IPC message
    pub fn on_message<C: CompilationService>(
        &mut self,
        request: &CompileRequest,
        compiler: &mut C,
    ) -> bool {
        if request.compiled_path.is_empty()
            || self.last_from_message.as_deref() == Some(request.compiled_path.as_str())
        {
            return false;
        }
        self.last_from_message = Some(request.compiled_path.clone());
        debug!(compiled = %request.compiled_path, "Compile request (message)");
        compiler.compile(request);
        true
    }
}
