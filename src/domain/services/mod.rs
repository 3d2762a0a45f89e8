//! Domain Services
//!
//! Pure decisions made on behalf of the supervisor.
//! These services have no I/O dependencies and are easily testable.

mod depth_filter;
mod missing_module;

pub use depth_filter::{dependency_level, should_watch, DependencyFilter};
pub use missing_module::{
    candidate_sources, normalize_lexically, MODULE_NOT_FOUND, SOURCE_EXTENSIONS,
};
