//! Missing-module resolution
//!
//! When the child fails on a relative require, the file it wanted usually has
//! not been written yet. The supervisor watches the source files that would
//! satisfy the require so the child restarts as soon as one appears.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::domain::entities::ChildError;

/// Error code reported for an unresolved module
pub const MODULE_NOT_FOUND: &str = "MODULE_NOT_FOUND";

/// Source extensions accepted by the compilation layer
pub const SOURCE_EXTENSIONS: [&str; 2] = ["ts", "tsx"];

/// Extensions a specifier may carry that refer to compiled output
const RUNTIME_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Source files that would satisfy the failed require in `error`
///
/// Returns `None` unless the error is a module-not-found on a relative specifier.
pub fn candidate_sources(error: &ChildError) -> Option<[PathBuf; 2]> {
    if error.code.as_deref() != Some(MODULE_NOT_FOUND) {
        return None;
    }
    let last = error.last_require.as_ref()?;
    if !last.path.starts_with('.') {
        return None;
    }

    let dir = Path::new(&last.filename)
        .parent()
        .unwrap_or_else(|| Path::new(""));
    let mut base = normalize_lexically(&dir.join(&last.path));

    let has_runtime_ext = base
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| RUNTIME_EXTENSIONS.contains(&ext))
        .unwrap_or(false);
    if has_runtime_ext {
        base.set_extension("");
    }

    Some(SOURCE_EXTENSIONS.map(|ext| append_extension(&base, ext)))
}

/// Resolve `.` and `..` components without touching the file system
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
