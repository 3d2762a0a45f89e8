//! Manual restart input
//!
//! A line consisting of `rs` on stdin restarts the child.

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::application::SupervisorEvent;

/// Command typed on stdin to restart the child
pub const RESTART_COMMAND: &str = "rs";

pub fn is_restart_command(line: &str) -> bool {
    line.trim() == RESTART_COMMAND
}

/// Forward every `rs` line of `input` as `ManualRestart`; returns on EOF
pub fn forward_restarts<R: BufRead>(input: R, events: &Sender<SupervisorEvent>) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        if is_restart_command(&line) && events.send(SupervisorEvent::ManualRestart).is_err() {
            break;
        }
    }
    debug!("Stopped reading stdin");
}

/// Read stdin on a background thread
pub fn spawn_stdin_reader(events: Sender<SupervisorEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("hotrun-stdin".to_string())
        .spawn(move || forward_restarts(io::stdin().lock(), &events))?;
    Ok(())
}
