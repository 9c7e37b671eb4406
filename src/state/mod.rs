//! State management module
//!
//! This module contains the countdown state machine, its shared session
//! wrapper and the read-only projections handed to the presentation layer.

pub mod app_state;
pub mod controller;
pub mod countdown_state;
pub mod display;
pub mod events;

// Re-export main types
pub use app_state::AppState;
pub use controller::{CountdownController, RunId, TickOutcome};
pub use countdown_state::CountdownState;
pub use display::DisplayModel;
pub use events::CountdownEvent;
