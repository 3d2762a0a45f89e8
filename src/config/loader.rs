//! Configuration loading
//!
//! Layers, lowest priority first: built-in defaults, the user config
//! (`<config dir>/hotrun/config.toml`), the project config (`.hotrun.toml` or
//! `--config`), then `HOTRUN_*` environment variables. CLI flags are applied
//! on top by the presentation layer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{HotrunError, HotrunResult};

use super::env_validator::{levenshtein, EnvOverrides};
use super::types::Config;

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".hotrun.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, ". Did you mean '{}'?", suggestion)?;
        }
        Ok(())
    }
}

fn invalid(path: &Path, e: impl std::fmt::Display) -> HotrunError {
    HotrunError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Parse one file, collecting unknown keys as warnings
fn parse_with_warnings(path: &Path, content: &str) -> HotrunResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| invalid(path, e))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> HotrunResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(path, &content)
}

/// Default user config location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hotrun").join("config.toml"))
}

/// Load the user config and the project config (or `explicit`), merged key by key
pub fn load_layered(explicit: Option<&Path>) -> HotrunResult<(Config, Vec<ConfigWarning>)> {
    let project = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(invalid(path, "config file not found"));
            }
            Some(path.to_path_buf())
        }
        None => Some(PathBuf::from(PROJECT_CONFIG_FILE)).filter(|p| p.exists()),
    };
    let user = user_config_path().filter(|p| p.exists());

    let files: Vec<PathBuf> = user.into_iter().chain(project).collect();
    let (config, warnings) = merge_files(&files)?;
    Ok((with_env_overrides(config), warnings))
}

/// Merge config files; later files override earlier ones key by key
pub fn merge_files(files: &[PathBuf]) -> HotrunResult<(Config, Vec<ConfigWarning>)> {
    let mut merged = toml::Table::new();
    let mut warnings = Vec::new();

    for path in files {
        let content = fs::read_to_string(path)?;
        let (_, file_warnings) = parse_with_warnings(path, &content)?;
        warnings.extend(file_warnings);

        let table: toml::Table = toml::from_str(&content).map_err(|e| invalid(path, e))?;
        merge_tables(&mut merged, table);
    }

    let config = toml::Value::Table(merged)
        .try_into::<Config>()
        .map_err(|e| HotrunError::InvalidConfig {
            file: files.last().cloned().unwrap_or_default(),
            message: e.to_string(),
        })?;
    Ok((config, warnings))
}

/// Deep-merge `overlay` into `base`; tables merge, everything else replaces
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Apply environment variable overrides (HOTRUN_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok(), &mut std::io::stderr())
}

pub(crate) fn with_env_overrides_from<W: Write>(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
    writer: &mut W,
) -> Config {
    let mut env = EnvOverrides::new(writer);

    if let Some(val) = get_env("HOTRUN_POLL") {
        config.watch.poll = env.flag("HOTRUN_POLL", &val, config.watch.poll);
    }
    if let Some(val) = get_env("HOTRUN_TREE_KILL") {
        config.tree_kill = env.flag("HOTRUN_TREE_KILL", &val, config.tree_kill);
    }
    if let Some(val) = get_env("HOTRUN_RESPAWN") {
        config.respawn = env.flag("HOTRUN_RESPAWN", &val, config.respawn);
    }
    if let Some(val) = get_env("HOTRUN_DEPS") {
        config.watch.deps = env.depth("HOTRUN_DEPS", &val, config.watch.deps);
    }
    if let Some(val) = get_env("HOTRUN_DEBOUNCE") {
        config.watch.debounce = env.millis("HOTRUN_DEBOUNCE", &val, config.watch.debounce, true);
    }
    if let Some(val) = get_env("HOTRUN_INTERVAL") {
        config.watch.interval = env.millis("HOTRUN_INTERVAL", &val, config.watch.interval, false);
    }

    // HOTRUN_RUNTIME
    if let Some(val) = get_env("HOTRUN_RUNTIME") {
        if !val.trim().is_empty() {
            config.runtime = val.trim().to_string();
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "runtime",
        "runtime_args",
        "prior_args",
        "hook_flag",
        "hook",
        "wrapper",
        "notify",
        "clear",
        "rs",
        "respawn",
        "tree_kill",
        "watch",
        "paths",
        "ignore",
        "pattern",
        "deps",
        "package_dir",
        "poll",
        "interval",
        "debounce",
        "compiler",
        "command",
        "build_config",
        "cache_dir",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
