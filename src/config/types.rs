//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::DEFAULT_DEBOUNCE_MS;
use crate::domain::services::DependencyFilter;
use crate::domain::value_objects::{DepthLimit, IgnoreRuleSpec, IgnoreRules, DEFAULT_PACKAGE_DIR};
use crate::error::HotrunResult;

use super::loader::{self, ConfigWarning};

/// File watching configuration (`[watch]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Extra files or directories watched for every child
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Strings are path prefixes, `{ pattern = "..." }` tables are regexes
    #[serde(default)]
    pub ignore: Vec<IgnoreRuleSpec>,

    /// Package nesting depth to watch; -1 is unlimited
    #[serde(default = "default_deps")]
    pub deps: i64,

    #[serde(default = "default_package_dir")]
    pub package_dir: String,

    #[serde(default)]
    pub poll: bool,

    /// Polling interval in milliseconds
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Debounce window in milliseconds
    #[serde(default = "default_debounce")]
    pub debounce: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            ignore: Vec::new(),
            deps: default_deps(),
            package_dir: default_package_dir(),
            poll: false,
            interval: default_interval(),
            debounce: default_debounce(),
        }
    }
}

impl WatchConfig {
    pub fn depth_limit(&self) -> HotrunResult<DepthLimit> {
        DepthLimit::from_config(self.deps)
    }

    /// Compile ignore rules and depth into the filter used for `required` paths
    pub fn dependency_filter(&self) -> HotrunResult<DependencyFilter> {
        let rules = IgnoreRules::compile(&self.ignore)?;
        Ok(DependencyFilter::new(rules, self.depth_limit()?).with_boundary(&self.package_dir))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce)
    }
}

/// Compilation service configuration (`[compiler]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Command run as `command... <source> <destination>`
    #[serde(default)]
    pub command: Vec<String>,

    /// Build configuration file; changing it reinitializes compilation
    #[serde(default)]
    pub build_config: Option<PathBuf>,

    /// Cache directory shared with the child (temporary when unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Arguments placed after the hook, before the script
    #[serde(default)]
    pub runtime_args: Vec<String>,

    /// Arguments placed before everything else
    #[serde(default)]
    pub prior_args: Vec<String>,

    #[serde(default = "default_hook_flag")]
    pub hook_flag: String,

    /// Module preloaded in the child to install compile hooks
    #[serde(default)]
    pub hook: Option<PathBuf>,

    /// Module run in place of the script, receiving the script as argument
    #[serde(default)]
    pub wrapper: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub notify: bool,

    /// Clear the screen before each restart
    #[serde(default)]
    pub clear: bool,

    /// Accept `rs` on stdin
    #[serde(default = "default_true")]
    pub rs: bool,

    /// Keep running after the child exits on its own
    #[serde(default)]
    pub respawn: bool,

    /// Signal the child's whole process group
    #[serde(default)]
    pub tree_kill: bool,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            runtime_args: Vec::new(),
            prior_args: Vec::new(),
            hook_flag: default_hook_flag(),
            hook: None,
            wrapper: None,
            notify: true,
            clear: false,
            rs: true,
            respawn: false,
            tree_kill: false,
            watch: WatchConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> HotrunResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> HotrunResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Merge user config and project config over the defaults, then apply `HOTRUN_*`
    pub fn load_layered(project_config: Option<&Path>) -> HotrunResult<(Self, Vec<ConfigWarning>)> {
        loader::load_layered(project_config)
    }

    /// Apply environment variable overrides (HOTRUN_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}

fn default_true() -> bool {
    true
}

fn default_runtime() -> String {
    "node".to_string()
}

fn default_hook_flag() -> String {
    "-r".to_string()
}

fn default_deps() -> i64 {
    1
}

fn default_package_dir() -> String {
    DEFAULT_PACKAGE_DIR.to_string()
}

fn default_interval() -> u64 {
    1000
}

fn default_debounce() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
