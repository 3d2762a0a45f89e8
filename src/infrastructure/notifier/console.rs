//! Terminal notifications
//!
//! One line per notification: `[HH:MM:SS] Title: message`. Info goes to
//! stdout, errors to stderr.

use std::env;
use std::io::{self, Write};

use chrono::Local;
use crossterm::style::{Color, Stylize};
use crossterm::{cursor, execute, terminal};
use is_terminal::IsTerminal;

use crate::domain::ports::{NotifyLevel, Notifier};

const INFO_COLOR: Color = Color::Green;
const ERROR_COLOR: Color = Color::Red;
const DIM_COLOR: Color = Color::DarkGrey;

/// Whether stdout can render ANSI colors
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal()
        && env::var_os("NO_COLOR").is_none()
        && !env::var("TERM").is_ok_and(|t| t.eq_ignore_ascii_case("dumb"))
}

/// Render one notification line (without trailing newline)
pub fn render_line(time: &str, title: &str, message: &str, level: NotifyLevel, color: bool) -> String {
    if !color {
        return format!("[{time}] {title}: {message}");
    }
    let title_color = match level {
        NotifyLevel::Info => INFO_COLOR,
        NotifyLevel::Error => ERROR_COLOR,
    };
    format!(
        "{} {}: {}",
        format!("[{time}]").with(DIM_COLOR),
        title.with(title_color).bold(),
        message
    )
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    color: bool,
    enabled: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            enabled: true,
        }
    }

    /// `--no-notify`: keep clearing the screen but print nothing
    pub fn silenced(mut self, silenced: bool) -> Self {
        self.enabled = !silenced;
        self
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str, level: NotifyLevel) {
        if !self.enabled {
            return;
        }
        let time = Local::now().format("%H:%M:%S").to_string();
        let line = render_line(&time, title, message, level, self.color);
        match level {
            NotifyLevel::Info => {
                let _ = writeln!(io::stdout(), "{line}");
            }
            NotifyLevel::Error => {
                let _ = writeln!(io::stderr(), "{line}");
            }
        }
    }

    fn clear_screen(&self) {
        let _ = execute!(
            io::stdout(),
            terminal::Clear(terminal::ClearType::All),
            terminal::Clear(terminal::ClearType::Purge),
            cursor::MoveTo(0, 0)
        );
    }
}
