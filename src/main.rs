//! hotrun CLI - development process supervisor
//!
//! Usage: hotrun [OPTIONS] <SCRIPT> [ARGS]...
//!
//! Runs SCRIPT under a runtime (node by default) and restarts it whenever a
//! file it required changes. Type `rs` and enter to restart manually.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hotrun::presentation::{run, Cli};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "hotrun=info",
        1 => "hotrun=debug",
        _ => "hotrun=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = run(cli)?;
    std::process::exit(code);
}
