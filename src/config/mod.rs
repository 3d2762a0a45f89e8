//! Configuration module for hotrun
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (HOTRUN_*)
//! 3. Project config (.hotrun.toml or --config)
//! 4. User config (~/.config/hotrun/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use env_validator::{levenshtein, EnvKind, EnvOverrides};
pub use loader::{user_config_path, ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{CompilerConfig, Config, WatchConfig};
