//! The `hotrun` command
//!
//! Loads layered config, applies the command line, wires up the supervisor
//! and runs the dispatcher until the child exits for good or a termination
//! signal arrives.

use std::sync::mpsc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::application::SupervisorEvent;
use crate::config::Config;
use crate::infrastructure::input::spawn_stdin_reader;

use super::cli::Cli;
use super::factory::{apply_cli, create_notifier, create_supervisor, resolve_script};

/// Run the supervisor; returns the exit code for the process
pub fn run(cli: Cli) -> Result<i32> {
    let (config, warnings) = Config::load_layered(cli.config.as_deref())?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    let config = apply_cli(config, &cli);
    debug!(?config, "Effective configuration");

    let script = resolve_script(&cli.script)?;
    let notifier = create_notifier(&config, cli.json, cli.color);

    let (tx, rx) = mpsc::channel::<SupervisorEvent>();

    if config.rs {
        spawn_stdin_reader(tx.clone()).context("Failed to read from stdin")?;
    }

    let signal_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = signal_tx.send(SupervisorEvent::Signal);
    })
    .context("Error setting termination handler")?;

    let mut session = create_supervisor(&config, script, &cli.args, notifier, tx)?;
    debug!(
        path = %session.request_watch.path().display(),
        "Compile requests"
    );

    let generation = session.supervisor.start()?;
    info!(generation, "Started {}", cli.script.display());

    Ok(session.supervisor.run(&rx))
}
