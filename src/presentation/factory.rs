//! Supervisor Factory
//!
//! Creates the supervisor with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use tracing::debug;

use crate::application::{
    ChildCommand, ChildController, MessageRouter, Supervisor, SupervisorEvent, SupervisorOptions,
};
use crate::config::Config;
use crate::domain::ports::{CompilationService, Notifier};
use crate::domain::value_objects::IgnoreRuleSpec;
use crate::error::{HotrunError, HotrunResult};
use crate::infrastructure::notifier::stdout_supports_color;
use crate::infrastructure::{
    CommandCompiler, ConsoleNotifier, JsonNotifier, NotifyWatchSet, ProcessLauncher,
    RequestFileWatch, WatchBackend,
};

use super::cli::{Cli, ColorWhen};

/// Extensions tried, in order, when the script path does not exist as given
pub const SCRIPT_EXTENSIONS: [&str; 4] = ["js", "ts", "mjs", "cjs"];

/// Type alias for the concrete supervisor with all dependencies
pub type ConcreteSupervisor =
    Supervisor<ProcessLauncher, NotifyWatchSet, CommandCompiler, Box<dyn Notifier>>;

/// A supervisor plus the watchers that must live as long as it runs
pub struct SupervisorSession {
    pub supervisor: ConcreteSupervisor,
    pub request_watch: RequestFileWatch,
}

/// Apply command line flags on top of the layered config
///
/// Scalars given on the command line replace the config value; list flags
/// are appended to the configured lists.
pub fn apply_cli(mut config: Config, cli: &Cli) -> Config {
    if let Some(runtime) = &cli.runtime {
        config.runtime = runtime.clone();
    }
    config.runtime_args.extend(cli.runtime_args.iter().cloned());
    config.prior_args.extend(cli.prior_args.iter().cloned());
    if let Some(hook) = &cli.hook {
        config.hook = Some(hook.clone());
    }
    if let Some(flag) = &cli.hook_flag {
        config.hook_flag = flag.clone();
    }
    if let Some(wrapper) = &cli.wrapper {
        config.wrapper = Some(wrapper.clone());
    }
    if let Some(compiler) = &cli.compiler {
        config.compiler.command = compiler.split_whitespace().map(str::to_string).collect();
    }
    if let Some(build_config) = &cli.build_config {
        config.compiler.build_config = Some(build_config.clone());
    }

    config.watch.paths.extend(cli.watch.iter().cloned());
    config
        .watch
        .ignore
        .extend(cli.ignore.iter().map(IgnoreRuleSpec::prefix));
    config
        .watch
        .ignore
        .extend(cli.ignore_pattern.iter().map(IgnoreRuleSpec::pattern));
    if let Some(deps) = cli.deps_override() {
        config.watch.deps = deps;
    }
    if let Some(package_dir) = &cli.package_dir {
        config.watch.package_dir = package_dir.clone();
    }
    if let Some(interval) = cli.interval {
        config.watch.interval = interval;
    }
    if let Some(debounce) = cli.debounce {
        config.watch.debounce = debounce;
    }

    config.watch.poll |= cli.poll;
    config.respawn |= cli.respawn;
    config.tree_kill |= cli.tree_kill;
    config.clear |= cli.clear;
    if cli.no_rs {
        config.rs = false;
    }
    if cli.no_notify {
        config.notify = false;
    }
    config
}

/// Find the script to run
///
/// An existing path is used as is; otherwise each of `SCRIPT_EXTENSIONS` is
/// appended in turn.
pub fn resolve_script(script: &Path) -> HotrunResult<PathBuf> {
    if script.as_os_str().is_empty() {
        return Err(HotrunError::EmptyScript);
    }
    if script.exists() {
        return Ok(script.to_path_buf());
    }

    let mut tried = Vec::new();
    for ext in SCRIPT_EXTENSIONS {
        let mut candidate = script.as_os_str().to_os_string();
        candidate.push(".");
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        if candidate.exists() {
            debug!(script = %candidate.display(), "Resolved script");
            return Ok(candidate);
        }
        tried.push(candidate.display().to_string());
    }

    Err(HotrunError::ScriptNotFound {
        path: script.to_path_buf(),
        tried: tried.join(", "),
    })
}

/// Whether console notifications should be colored
pub fn use_color(color: Option<ColorWhen>) -> bool {
    match color.unwrap_or(ColorWhen::Auto) {
        ColorWhen::Always => true,
        ColorWhen::Never => false,
        ColorWhen::Auto => stdout_supports_color(),
    }
}

/// Create the notifier selected by `--json` / `--color` / `notify`
pub fn create_notifier(config: &Config, json: bool, color: Option<ColorWhen>) -> Box<dyn Notifier> {
    if json {
        Box::new(JsonNotifier::stdout())
    } else {
        Box::new(ConsoleNotifier::new(use_color(color)).silenced(!config.notify))
    }
}

/// Build the child command line template from config
pub fn create_child_command(
    config: &Config,
    script: PathBuf,
    script_args: &[String],
) -> HotrunResult<ChildCommand> {
    let os = |args: &[String]| args.iter().map(OsString::from).collect::<Vec<_>>();

    Ok(ChildCommand::new(config.runtime.as_str(), script)
        .with_prior_args(os(&config.prior_args))
        .with_hook_flag(config.hook_flag.as_str())
        .with_runtime_args(os(&config.runtime_args))
        .with_wrapper(config.wrapper.clone())
        .with_script_args(os(script_args))
        .with_cwd(env::current_dir()?))
}

/// Create the compilation service from `[compiler]` and the hook setting
pub fn create_compiler(config: &Config) -> HotrunResult<CommandCompiler> {
    Ok(CommandCompiler::new(config.compiler.cache_dir.clone())?
        .with_command(config.compiler.command.clone())
        .with_build_config(config.compiler.build_config.clone())
        .with_hook(config.hook.clone()))
}

/// Watch backend selected by `[watch] poll` / `interval`
pub fn watch_backend(config: &Config) -> WatchBackend {
    if config.watch.poll {
        WatchBackend::Poll(config.watch.interval())
    } else {
        WatchBackend::Native
    }
}

/// Create a supervisor with all dependencies wired up
///
/// Every adapter reports into `events`; the caller runs the dispatcher on the
/// receiving end.
pub fn create_supervisor(
    config: &Config,
    script: PathBuf,
    script_args: &[String],
    notifier: Box<dyn Notifier>,
    events: Sender<SupervisorEvent>,
) -> HotrunResult<SupervisorSession> {
    let filter = config.watch.dependency_filter()?;
    let command = create_child_command(config, script, script_args)?;

    let launcher = ProcessLauncher::new(events.clone()).with_process_groups(config.tree_kill);
    let controller = ChildController::new(launcher)
        .with_tree_kill(config.tree_kill)
        .with_respawn(config.respawn);

    let backend = watch_backend(config);
    let watch_set = NotifyWatchSet::new(events.clone(), backend)?
        .with_fallback_interval(config.watch.interval());

    let compiler = create_compiler(config)?;
    let request_watch = RequestFileWatch::start(compiler.compile_request_file(), backend, events)?;

    let options = SupervisorOptions {
        extra_watches: config.watch.paths.clone(),
        clear_screen: config.clear,
        debounce: config.watch.debounce(),
    };

    let supervisor = Supervisor::new(
        controller,
        command,
        watch_set,
        compiler,
        notifier,
        MessageRouter::new(filter),
        options,
    );

    Ok(SupervisorSession {
        supervisor,
        request_watch,
    })
}
