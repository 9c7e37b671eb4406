//! Terminal front-end
//!
//! Reads commands from stdin, maps them onto the countdown operations and
//! redraws the ring whenever the visible frame changes.

pub mod commands;
pub mod render;
pub mod responses;

use std::{io::BufRead, sync::Arc, thread};
use serde::Serialize;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{debug, info, warn};

use crate::state::{AppState, DisplayModel};
use commands::{handle_command, Command, HELP};
use render::render_frame;
use responses::CommandReply;

/// How frames and replies are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Run the console until the user quits or stdin closes
pub async fn run_console(state: Arc<AppState>, mode: OutputMode) -> Result<(), String> {
    let mut lines = spawn_stdin_reader();
    let mut state_rx = state.subscribe();
    let mut events_rx = state.subscribe_events();
    let mut last_frame: Option<String> = None;

    if mode == OutputMode::Text {
        println!("{}", HELP);
    }
    let initial = state.snapshot()?;
    draw(&DisplayModel::from(&initial), mode, &mut last_frame);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => return Err(e),
                    None => {
                        info!("stdin closed, leaving console");
                        break;
                    }
                };

                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => match handle_command(&state, command) {
                        Ok(reply) => emit(&reply, mode),
                        Err(e) => eprintln!("error: {}", e),
                    },
                    Err(e) => eprintln!("{} (type ? for help)", e),
                }
            }

            changed = state_rx.changed() => {
                if changed.is_err() {
                    warn!("Countdown state channel closed");
                    break;
                }
                let display = DisplayModel::from(&*state_rx.borrow_and_update());
                draw(&display, mode, &mut last_frame);
            }

            event = events_rx.recv() => match event {
                Ok(event) => info!("Countdown {}", event.name()),
                Err(RecvError::Lagged(skipped)) => debug!("Skipped {} countdown events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    }

    Ok(())
}

/// Forward stdin lines from a dedicated thread, outside the runtime
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<Result<String, String>> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = line.map_err(|e| format!("Failed to read stdin: {}", e));
            let failed = line.is_err();
            if line_tx.send(line).is_err() || failed {
                break;
            }
        }
    });

    line_rx
}

/// Print a frame unless it looks the same as the previous one
fn draw(display: &DisplayModel, mode: OutputMode, last_frame: &mut Option<String>) {
    let frame = render_frame(display);
    if last_frame.as_deref() == Some(frame.as_str()) {
        return;
    }

    match mode {
        OutputMode::Text => println!("{}", frame),
        OutputMode::Json => print_json(display),
    }
    *last_frame = Some(frame);
}

fn emit(reply: &CommandReply, mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(reply);
        return;
    }

    match reply {
        CommandReply::Action(action) => println!("{}", action.message),
        CommandReply::Status(status) => {
            println!("{}", render_frame(&status.display));
            println!(
                "duration {}ms, remaining {}ms, {}",
                status.countdown.total_duration_ms,
                status.countdown.remaining_ms,
                if status.countdown.is_running { "running" } else { "idle" },
            );
            println!(
                "tick {}ms, step {}ms, up {}, last action {}",
                status.tick_period_ms,
                status.step_ms,
                status.uptime,
                status.last_action.as_deref().unwrap_or("none"),
            );
        }
        CommandReply::Help { text } => println!("{}", text),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("Failed to serialize output: {}", e),
    }
}
