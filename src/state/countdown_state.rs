//! Countdown state structure

use serde::{Deserialize, Serialize};

/// Snapshot of the countdown published to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownState {
    /// Configured countdown length
    pub total_duration_ms: u64,
    /// Time left in the current run, never above `total_duration_ms`
    pub remaining_ms: u64,
    pub is_running: bool,
    /// `remaining_ms / total_duration_ms`, 1.0 for a zero-length countdown
    pub fraction_remaining: f32,
}

impl CountdownState {
    /// Create an idle state showing the full duration
    pub fn idle(total_duration_ms: u64) -> Self {
        Self {
            total_duration_ms,
            remaining_ms: total_duration_ms,
            is_running: false,
            fraction_remaining: 1.0,
        }
    }

    /// Whole seconds shown on the display
    pub fn displayed_seconds(&self) -> u64 {
        self.remaining_ms / 1000
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::idle(super::controller::DEFAULT_DURATION_MS)
    }
}

/// Fraction of the countdown still left, clamped to `[0, 1]`
pub fn fraction_for(remaining_ms: u64, total_duration_ms: u64) -> f32 {
    if total_duration_ms == 0 {
        return 1.0;
    }
    let fraction = remaining_ms as f64 / total_duration_ms as f64;
    fraction.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_state_is_full() {
        let state = CountdownState::idle(15_000);
        assert_eq!(state.remaining_ms, 15_000);
        assert!(!state.is_running);
        assert_eq!(state.fraction_remaining, 1.0);
        assert_eq!(state.displayed_seconds(), 15);
    }

    #[test]
    fn fraction_handles_zero_duration() {
        assert_eq!(fraction_for(0, 0), 1.0);
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(fraction_for(7_500, 15_000), 0.5);
        assert_eq!(fraction_for(20_000, 15_000), 1.0);
        assert_eq!(fraction_for(0, 15_000), 0.0);
    }

    #[test]
    fn displayed_seconds_truncate() {
        let mut state = CountdownState::idle(15_000);
        state.remaining_ms = 14_999;
        assert_eq!(state.displayed_seconds(), 14);
    }
}
