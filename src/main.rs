//! Ring Timer - A countdown ring timer
//!
//! This is the main entry point for the ring-timer application.

use std::sync::Arc;
use tracing::info;

use ring_timer::{
    config::Config,
    console::{run_console, OutputMode},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries frames and replies
    tracing_subscriber::fmt()
        .with_env_filter(format!("ring_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let settings = config.timer_settings();
    info!("Starting ring-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: duration={}ms, tick={:?}, step={}ms",
          settings.initial_duration_ms, settings.tick_period, settings.step_ms);

    let state = Arc::new(AppState::new(settings));

    if config.autostart {
        state.start().map_err(anyhow::Error::msg)?;
    }

    let mode = if config.json { OutputMode::Json } else { OutputMode::Text };

    tokio::select! {
        result = run_console(Arc::clone(&state), mode) => {
            if let Err(e) = result {
                tracing::error!("Console error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown().map_err(anyhow::Error::msg)?;
    info!("Countdown session closed");
    Ok(())
}
