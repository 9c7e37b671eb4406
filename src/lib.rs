//! Ring Timer - A countdown ring timer
//!
//! This library provides a countdown state machine driven by a cancellable
//! tick source, the read-only projection used to draw the ring, and a
//! terminal front-end bound to the start/stop and add/remove time controls.

pub mod config;
pub mod state;
pub mod console;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, TimerSettings};
pub use state::{AppState, CountdownController, CountdownState, DisplayModel};
pub use console::{run_console, OutputMode};
pub use utils::signals::shutdown_signal;
