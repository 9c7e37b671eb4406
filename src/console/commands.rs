//! Console command parsing and handlers

use std::{str::FromStr, sync::Arc};
use tracing::{error, info};

use crate::state::{AppState, CountdownState};
use super::responses::{CommandReply, StatusReport};

/// A line typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The play/stop control
    Toggle,
    Start,
    Stop,
    /// The "Add Time" control
    AddTime,
    /// The "Remove Time" control
    RemoveTime,
    Adjust(i64),
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Self::Toggle);
        };

        let command = match word.to_lowercase().as_str() {
            "t" | "toggle" => Self::Toggle,
            "start" => Self::Start,
            "stop" => Self::Stop,
            "+" | "add" => Self::AddTime,
            "-" | "remove" => Self::RemoveTime,
            "adjust" => {
                let delta = words.next()
                    .ok_or_else(|| "adjust needs a delta in milliseconds".to_string())?;
                let delta = delta.parse::<i64>()
                    .map_err(|e| format!("Invalid delta '{}': {}", delta, e))?;
                Self::Adjust(delta)
            }
            "s" | "status" => Self::Status,
            "?" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => return Err(format!("Unknown command '{}'", other)),
        };

        if let Some(extra) = words.next() {
            return Err(format!("Unexpected argument '{}'", extra));
        }
        Ok(command)
    }
}

/// Text listing the available commands
pub const HELP: &str = "\
Commands:
  <enter>, t, toggle  start or stop the countdown
  start / stop        start or stop explicitly
  +, add              add time
  -, remove           remove time
  adjust <ms>         change the duration by a signed amount
  s, status           show the current status
  ?, help             show this help
  q, quit             exit";

/// Run a command against the session
pub fn handle_command(state: &Arc<AppState>, command: Command) -> Result<CommandReply, String> {
    match command {
        Command::Toggle => reply(state.toggle(), |s| {
            if s.is_running { "Countdown started" } else { "Countdown stopped" }
        }),
        Command::Start => reply(state.start(), |s| {
            if s.is_running { "Countdown running" } else { "Nothing to count down" }
        }),
        Command::Stop => reply(state.stop(), |_| "Countdown stopped"),
        Command::AddTime => reply(state.add_time(), |_| "Time added"),
        Command::RemoveTime => reply(state.remove_time(), |_| "Time removed"),
        Command::Adjust(delta) => reply(state.adjust_duration(delta), |_| "Duration adjusted"),
        Command::Status => {
            let countdown = state.snapshot()?;
            Ok(CommandReply::Status(StatusReport::new(state, countdown)))
        }
        Command::Help => Ok(CommandReply::Help { text: HELP }),
        Command::Quit => Err("quit is handled by the console loop".to_string()),
    }
}

fn reply<F>(result: Result<CountdownState, String>, message: F) -> Result<CommandReply, String>
where
    F: FnOnce(&CountdownState) -> &'static str,
{
    match result {
        Ok(countdown) => {
            let message = message(&countdown);
            info!("{}", message);
            Ok(CommandReply::action(message.to_string(), countdown))
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e)
        }
    }
}
