//! Tests for the config module

use super::loader::{merge_files, with_env_overrides_from};
use super::types::*;
use crate::domain::value_objects::{DepthLimit, IgnoreRuleSpec};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.runtime, "node");
    assert_eq!(config.hook_flag, "-r");
    assert!(config.notify);
    assert!(config.rs);
    assert!(!config.respawn);
    assert!(!config.tree_kill);
    assert_eq!(config.watch.deps, 1);
    assert_eq!(config.watch.package_dir, "node_modules");
    assert_eq!(config.watch.debounce(), Duration::from_millis(10));
    assert_eq!(config.watch.interval(), Duration::from_millis(1000));
}

#[test]
fn test_empty_file_equals_default() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
runtime = "bun"
runtime_args = ["--smol"]
respawn = true
tree_kill = true

[watch]
paths = [".env"]
ignore = ["/proj/dist", { pattern = "\\.generated\\." }]
deps = -1
package_dir = "deps"
poll = true
interval = 250
debounce = 50

[compiler]
command = ["esbuild-one"]
build_config = "tsconfig.json"
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.runtime, "bun");
    assert_eq!(config.runtime_args, vec!["--smol"]);
    assert!(config.respawn);
    assert!(config.tree_kill);
    assert_eq!(config.watch.paths, vec![PathBuf::from(".env")]);
    assert_eq!(
        config.watch.ignore,
        vec![
            IgnoreRuleSpec::prefix("/proj/dist"),
            IgnoreRuleSpec::pattern("\\.generated\\.")
        ]
    );
    assert_eq!(config.watch.depth_limit().unwrap(), DepthLimit::Unlimited);
    assert!(config.watch.poll);
    assert_eq!(config.watch.interval(), Duration::from_millis(250));
    assert_eq!(config.watch.debounce(), Duration::from_millis(50));
    assert_eq!(config.compiler.command, vec!["esbuild-one"]);
    assert_eq!(
        config.compiler.build_config,
        Some(PathBuf::from("tsconfig.json"))
    );
}

#[test]
fn test_dependency_filter_from_config() {
    let toml = r#"
[watch]
deps = 0
package_dir = "deps"
ignore = [{ pattern = "fixtures" }]
"#;
    let config: Config = toml::from_str(toml).unwrap();
    let filter = config.watch.dependency_filter().unwrap();

    assert_eq!(filter.boundary(), "deps");
    assert!(filter.should_watch("/proj/src/a.js"));
    assert!(!filter.should_watch("/proj/deps/foo/index.js"));
    assert!(!filter.should_watch("/proj/src/fixtures/a.js"));
}

#[test]
fn test_invalid_depth_is_rejected() {
    let config: Config = toml::from_str("[watch]\ndeps = -2").unwrap();
    assert!(config.watch.depth_limit().is_err());
}

#[test]
fn test_invalid_ignore_pattern_is_rejected() {
    let config: Config = toml::from_str("[watch]\nignore = [{ pattern = \"(\" }]").unwrap();
    let err = config.watch.dependency_filter().unwrap_err();
    assert!(err.to_string().contains("invalid ignore pattern"));
}

#[test]
fn test_load_with_warnings_reports_unknown_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".hotrun.toml");
    fs::write(&path, "runtim = \"node\"\n\n[watch]\ndebounse = 20\n").unwrap();

    let (config, warnings) = Config::load_with_warnings(&path).unwrap();

    assert_eq!(config.runtime, "node");
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].key, "runtim");
    assert_eq!(warnings[0].line, Some(1));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("runtime"));
    assert_eq!(warnings[1].key, "debounse");
    assert_eq!(warnings[1].suggestion.as_deref(), Some("debounce"));
    assert!(warnings[1].to_string().contains("Did you mean 'debounce'?"));
}

#[test]
fn test_load_reports_type_errors_with_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".hotrun.toml");
    fs::write(&path, "[watch]\ndeps = \"all\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains(".hotrun.toml"));
}

#[test]
fn test_project_overrides_user_key_by_key() {
    let dir = tempdir().unwrap();
    let user = dir.path().join("user.toml");
    let project = dir.path().join("project.toml");
    fs::write(
        &user,
        "runtime = \"bun\"\nclear = true\n[watch]\npoll = true\ninterval = 300\n",
    )
    .unwrap();
    fs::write(&project, "[watch]\ninterval = 500\n").unwrap();

    let (config, warnings) = merge_files(&[user, project]).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(config.runtime, "bun");
    assert!(config.clear);
    assert!(config.watch.poll);
    assert_eq!(config.watch.interval, 500);
}

#[test]
fn test_merge_without_files_is_default() {
    let (config, warnings) = merge_files(&[]).unwrap();
    assert_eq!(config, Config::default());
    assert!(warnings.is_empty());
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = tempdir().unwrap();
    let err = Config::load_layered(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("config file not found"));
}

#[test]
fn test_env_overrides() {
    let vars = [
        ("HOTRUN_POLL", "true"),
        ("HOTRUN_DEPS", "-1"),
        ("HOTRUN_DEBOUNCE", "25"),
        ("HOTRUN_INTERVAL", "100"),
        ("HOTRUN_TREE_KILL", "1"),
        ("HOTRUN_RESPAWN", "yes"),
        ("HOTRUN_RUNTIME", "deno"),
    ];
    let mut output = Vec::new();

    let config = with_env_overrides_from(Config::default(), env(&vars), &mut output);

    assert!(config.watch.poll);
    assert_eq!(config.watch.deps, -1);
    assert_eq!(config.watch.debounce, 25);
    assert_eq!(config.watch.interval, 100);
    assert!(config.tree_kill);
    assert!(config.respawn);
    assert_eq!(config.runtime, "deno");
    assert!(output.is_empty());
}

#[test]
fn test_invalid_env_value_keeps_config_and_warns() {
    let vars = [("HOTRUN_POLL", "ture"), ("HOTRUN_DEPS", "-5")];
    let mut output = Vec::new();

    let config = with_env_overrides_from(Config::default(), env(&vars), &mut output);

    assert!(!config.watch.poll);
    assert_eq!(config.watch.deps, 1);
    let msg = String::from_utf8(output).unwrap();
    assert!(msg.contains("HOTRUN_POLL"));
    assert!(msg.contains("HOTRUN_DEPS"));
}

#[test]
fn test_env_deps_accepts_any_depth_and_hints_keywords() {
    let mut output = Vec::new();
    let config = with_env_overrides_from(
        Config::default(),
        env(&[("HOTRUN_DEPS", "5"), ("HOTRUN_DEBOUNCE", "40ms")]),
        &mut output,
    );

    assert_eq!(config.watch.deps, 5);
    assert_eq!(config.watch.debounce, Config::default().watch.debounce);
    let msg = String::from_utf8(output).unwrap();
    assert!(!msg.contains("HOTRUN_DEPS"), "{}", msg);
    assert!(msg.contains("HOTRUN_DEBOUNCE='40ms'. Did you mean '40'?"), "{}", msg);
}
