//! CLI Argument Parsing
//!
//! `hotrun [OPTIONS] <SCRIPT> [ARGS]...`
//!
//! Every flag overrides the corresponding config key; everything after the
//! script is passed to the script untouched.

use std::path::PathBuf;

use clap::Parser;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// hotrun - restart a script whenever one of its dependencies changes
#[derive(Parser, Debug)]
#[command(name = "hotrun")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Type 'rs' and press enter to restart the script manually.")]
pub struct Cli {
    /// Script to run
    pub script: PathBuf,

    /// Arguments passed to the script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Runtime executable used to run the script
    #[arg(long, value_name = "PROGRAM")]
    pub runtime: Option<String>,

    /// Argument passed to the runtime after the hook (repeatable)
    #[arg(long = "runtime-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub runtime_args: Vec<String>,

    /// Argument passed to the runtime before everything else (repeatable)
    #[arg(long = "prior-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub prior_args: Vec<String>,

    /// Module preloaded in the child to install compile hooks
    #[arg(long, value_name = "FILE")]
    pub hook: Option<PathBuf>,

    /// Runtime flag used to preload the hook
    #[arg(long, value_name = "FLAG", allow_hyphen_values = true)]
    pub hook_flag: Option<String>,

    /// Module run in place of the script, receiving the script as argument
    #[arg(long, value_name = "FILE")]
    pub wrapper: Option<PathBuf>,

    /// Command that compiles one file: `<command> <source> <destination>`
    #[arg(long, value_name = "COMMAND")]
    pub compiler: Option<String>,

    /// Build configuration file; changing it reinitializes compilation
    #[arg(long, value_name = "FILE")]
    pub build_config: Option<PathBuf>,

    /// Extra files or directories to watch (comma-separated, repeatable)
    #[arg(long, value_name = "PATHS", value_delimiter = ',')]
    pub watch: Vec<PathBuf>,

    /// Ignore required files whose path starts with PREFIX (repeatable)
    #[arg(long, value_name = "PREFIX")]
    pub ignore: Vec<String>,

    /// Ignore required files whose path matches REGEX (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub ignore_pattern: Vec<String>,

    /// Package nesting depth to watch (-1 = unlimited)
    #[arg(long, value_name = "N", allow_negative_numbers = true, conflicts_with_all = ["all_deps", "no_deps"])]
    pub deps: Option<i64>,

    /// Watch dependencies at any depth
    #[arg(long, conflicts_with = "no_deps")]
    pub all_deps: bool,

    /// Do not watch files inside packages
    #[arg(long)]
    pub no_deps: bool,

    /// Directory name marking a package boundary
    #[arg(long, value_name = "NAME")]
    pub package_dir: Option<String>,

    /// Use polling instead of native file system events
    #[arg(long)]
    pub poll: bool,

    /// Polling interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval: Option<u64>,

    /// Debounce window in milliseconds
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Keep running after the script exits on its own
    #[arg(long)]
    pub respawn: bool,

    /// Signal the script's whole process group on restart
    #[arg(long)]
    pub tree_kill: bool,

    /// Clear the screen before each restart
    #[arg(long)]
    pub clear: bool,

    /// Do not read `rs` from stdin
    #[arg(long)]
    pub no_rs: bool,

    /// Do not print notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Config file to use instead of ./.hotrun.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print notifications as NDJSON
    #[arg(long)]
    pub json: bool,

    /// Color output mode
    #[arg(long, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Depth requested on the command line, if any (-1 = unlimited)
    pub fn deps_override(&self) -> Option<i64> {
        if self.all_deps {
            Some(-1)
        } else if self.no_deps {
            Some(0)
        } else {
            self.deps
        }
    }
}
