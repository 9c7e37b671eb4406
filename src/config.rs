//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::controller::{DEFAULT_DURATION_MS, DEFAULT_STEP_MS};

/// Default period between tick deliveries, in milliseconds
pub const DEFAULT_TICK_MS: u64 = 10;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "ring-timer")]
#[command(about = "A countdown ring timer for the terminal")]
#[command(version)]
pub struct Config {
    /// Initial countdown length in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_DURATION_MS)]
    pub duration_ms: u64,

    /// Tick period in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Amount added or removed by the +/- controls, in milliseconds
    #[arg(long, default_value_t = DEFAULT_STEP_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_ms: u64,

    /// Start the countdown immediately
    #[arg(short, long)]
    pub autostart: bool,

    /// Print frames and replies as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            initial_duration_ms: self.duration_ms,
            tick_period: Duration::from_millis(self.tick_ms),
            step_ms: self.step_ms,
        }
    }
}

/// Settings the countdown session is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub initial_duration_ms: u64,
    pub tick_period: Duration,
    pub step_ms: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            initial_duration_ms: DEFAULT_DURATION_MS,
            tick_period: Duration::from_millis(DEFAULT_TICK_MS),
            step_ms: DEFAULT_STEP_MS,
        }
    }
}
