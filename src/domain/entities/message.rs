//! Child IPC messages
//!
//! The child writes one JSON object per line. Each object is validated into a
//! `ChildMessage` variant at the boundary; anything that fits no variant is
//! rejected before it reaches the supervisor.
//!
//! ```text
//! {"required":"/proj/src/a.js"}
//! {"code":"MODULE_NOT_FOUND","message":"...","lastRequire":{"filename":"...","path":"./b"},"willTerminate":false}
//! {"compiledPath":"/cache/a.js","compile":"/proj/src/a.ts"}
//! ```

use serde::{Deserialize, Serialize};

/// A file the child has just loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredModule {
    pub required: String,
}

/// The last `require` the child attempted before failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRequire {
    /// File that issued the require
    pub filename: String,
    /// Specifier as written in the source
    pub path: String,
}

/// An error the child reports before it stops or terminates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildError {
    #[serde(default)]
    pub code: Option<String>,
    /// Error class name, when the runtime provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_require: Option<LastRequire>,
    /// The child exits on its own after sending this message
    #[serde(default)]
    pub will_terminate: bool,
}

impl ChildError {
    /// Title used when the error is surfaced to the user
    pub fn title(&self) -> &str {
        self.error
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or("Error")
    }
}

/// Request to compile a source into a destination file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    /// Source indicator understood by the compiler
    pub compile: String,
    /// Destination path; identity for deduplication
    pub compiled_path: String,
}

impl CompileRequest {
    pub fn new(compile: impl Into<String>, compiled_path: impl Into<String>) -> Self {
        Self {
            compile: compile.into(),
            compiled_path: compiled_path.into(),
        }
    }
}

/// Every message kind the child can send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildMessage {
    Required(RequiredModule),
    Compile(CompileRequest),
    Error(ChildError),
}

impl ChildMessage {
    /// Decode a single line received from the child
    pub fn decode(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    /// Encode as a single line (without trailing newline)
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ChildMessage::Required(_) => "required",
            ChildMessage::Compile(_) => "compile",
            ChildMessage::Error(_) => "error",
        }
    }
}
