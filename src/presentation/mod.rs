//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Merging the command line over layered config
//! - Creating the supervisor with infrastructure dependencies
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `factory` - Creates the supervisor with proper dependencies (dependency injection)
//! - `run` - The `hotrun` command itself
//!
//! ## Usage
//!
//! ```ignore
//! use clap::Parser;
//! use hotrun::presentation::{run, Cli};
//!
//! let code = run(Cli::parse())?;
//! std::process::exit(code);
//! ```

pub mod cli;
pub mod factory;
pub mod run;

pub use cli::{Cli, ColorWhen};
pub use factory::{apply_cli, create_supervisor, resolve_script, ConcreteSupervisor};
pub use run::run;
