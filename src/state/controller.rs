//! Countdown state machine
//!
//! The controller is a plain value with no timers of its own. Whoever owns it
//! feeds it ticks (see [`crate::tasks::countdown_tick_task`]) and reads the
//! resulting [`CountdownState`].

use std::time::Duration;

use tracing::{debug, info};

use super::countdown_state::{fraction_for, CountdownState};

/// Countdown length a new session starts with
pub const DEFAULT_DURATION_MS: u64 = 15_000;
/// Amount the add/remove controls change the duration by
pub const DEFAULT_STEP_MS: u64 = 1_000;

/// Identifies one Idle -> Running transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

/// What a delivered tick did to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was idle or the tick belonged to an old run
    Ignored,
    /// Time was taken off and the countdown keeps running
    Running,
    /// The countdown reached zero and reset to its full duration
    Finished,
}

#[derive(Debug, Clone)]
pub struct CountdownController {
    state: CountdownState,
    step_ms: u64,
    runs_started: u64,
    active_run: Option<RunId>,
}

impl CountdownController {
    pub fn new(total_duration_ms: u64) -> Self {
        Self::with_step(total_duration_ms, DEFAULT_STEP_MS)
    }

    pub fn with_step(total_duration_ms: u64, step_ms: u64) -> Self {
        Self {
            state: CountdownState::idle(total_duration_ms),
            step_ms,
            runs_started: 0,
            active_run: None,
        }
    }

    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active_run
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// Idle -> Running. Returns `None` when already running or when there is
    /// no time to count down.
    pub fn start(&mut self) -> Option<RunId> {
        if self.state.is_running {
            debug!("Start ignored, countdown already running");
            return None;
        }
        if self.state.total_duration_ms == 0 {
            debug!("Start ignored, countdown duration is zero");
            return None;
        }

        self.runs_started += 1;
        let run = RunId(self.runs_started);
        self.state = CountdownState::idle(self.state.total_duration_ms);
        self.state.is_running = true;
        self.active_run = Some(run);

        info!("Countdown started: {}ms", self.state.total_duration_ms);
        Some(run)
    }

    /// Running -> Idle, resetting the display to the full duration.
    /// Returns false when the countdown was already idle.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_running {
            debug!("Stop ignored, countdown is idle");
            return false;
        }
        info!("Countdown stopped with {}ms left", self.state.remaining_ms);
        self.reset();
        true
    }

    /// Take `elapsed` off the remaining time
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Ignored;
        }

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.state.remaining_ms = self.state.remaining_ms.saturating_sub(elapsed_ms);

        if self.state.remaining_ms == 0 {
            info!("Countdown finished after {}ms", self.state.total_duration_ms);
            self.reset();
            return TickOutcome::Finished;
        }

        self.state.fraction_remaining =
            fraction_for(self.state.remaining_ms, self.state.total_duration_ms);
        TickOutcome::Running
    }

    /// Same as [`tick`](Self::tick), but only for ticks issued on behalf of
    /// the active run
    pub fn tick_run(&mut self, run: RunId, elapsed: Duration) -> TickOutcome {
        if self.active_run != Some(run) {
            debug!("Dropping tick for inactive run {:?}", run);
            return TickOutcome::Ignored;
        }
        self.tick(elapsed)
    }

    /// Stop any run, then change the duration by `delta_ms`.
    ///
    /// Increments always apply. A decrement applies only while the duration
    /// stays above zero. Returns whether the duration changed.
    pub fn adjust_duration(&mut self, delta_ms: i64) -> bool {
        self.stop();

        let total = self.state.total_duration_ms;
        let new_total = if delta_ms >= 0 {
            total.saturating_add(delta_ms.unsigned_abs())
        } else {
            let decrement = delta_ms.unsigned_abs();
            if total > decrement {
                total - decrement
            } else {
                debug!("Refusing to drop duration {}ms by {}ms", total, decrement);
                total
            }
        };

        self.state = CountdownState::idle(new_total);
        if new_total != total {
            info!("Countdown duration adjusted: {}ms -> {}ms", total, new_total);
        }
        new_total != total
    }

    pub fn add_time(&mut self) -> bool {
        self.adjust_duration(step_delta(self.step_ms))
    }

    pub fn remove_time(&mut self) -> bool {
        self.adjust_duration(-step_delta(self.step_ms))
    }

    fn reset(&mut self) {
        self.state = CountdownState::idle(self.state.total_duration_ms);
        self.active_run = None;
    }
}

impl Default for CountdownController {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

fn step_delta(step_ms: u64) -> i64 {
    i64::try_from(step_ms).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn starts_idle_with_default_duration() {
        let controller = CountdownController::default();
        assert_eq!(controller.state(), &CountdownState::idle(15_000));
        assert!(controller.active_run().is_none());
    }

    #[test]
    fn start_is_noop_when_running() {
        let mut controller = CountdownController::default();
        let run = controller.start();
        assert!(run.is_some());
        assert!(controller.start().is_none());
        assert_eq!(controller.active_run(), run);
    }

    #[test]
    fn start_refuses_zero_duration() {
        let mut controller = CountdownController::new(0);
        assert!(controller.start().is_none());
        assert!(!controller.is_running());
        assert_eq!(controller.state().fraction_remaining, 1.0);
    }

    #[test]
    fn each_start_gets_a_new_run() {
        let mut controller = CountdownController::default();
        let first = controller.start().unwrap();
        controller.stop();
        let second = controller.start().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn tick_decrements_and_updates_fraction() {
        let mut controller = CountdownController::new(10_000);
        controller.start();
        assert_eq!(controller.tick(ms(2_500)), TickOutcome::Running);
        assert_eq!(controller.state().remaining_ms, 7_500);
        assert_eq!(controller.state().fraction_remaining, 0.75);
        assert!(controller.is_running());
    }

    #[test]
    fn tick_while_idle_is_ignored() {
        let mut controller = CountdownController::default();
        assert_eq!(controller.tick(ms(1_000)), TickOutcome::Ignored);
        assert_eq!(controller.state(), &CountdownState::idle(15_000));
    }

    #[test]
    fn finishing_resets_to_full() {
        let mut controller = CountdownController::default();
        controller.start();
        for _ in 0..1_499 {
            assert_eq!(controller.tick(ms(10)), TickOutcome::Running);
        }
        assert_eq!(controller.tick(ms(10)), TickOutcome::Finished);
        assert_eq!(
            controller.state(),
            &CountdownState {
                total_duration_ms: 15_000,
                remaining_ms: 15_000,
                is_running: false,
                fraction_remaining: 1.0,
            }
        );
        assert!(controller.active_run().is_none());
    }

    #[test]
    fn overshooting_tick_clamps_at_zero_and_finishes() {
        let mut controller = CountdownController::new(1_000);
        controller.start();
        assert_eq!(controller.tick(ms(60_000)), TickOutcome::Finished);
        assert_eq!(controller.state().remaining_ms, 1_000);
    }

    #[test]
    fn stop_resets_instead_of_pausing() {
        let mut controller = CountdownController::default();
        controller.start();
        controller.tick(ms(4_000));
        assert!(controller.stop());
        assert_eq!(controller.state(), &CountdownState::idle(15_000));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut controller = CountdownController::default();
        controller.start();
        controller.tick(ms(300));
        controller.stop();
        let once = controller.state().clone();
        assert!(!controller.stop());
        assert_eq!(controller.state(), &once);
    }

    #[test]
    fn stale_run_ticks_are_dropped() {
        let mut controller = CountdownController::default();
        let old = controller.start().unwrap();
        controller.stop();
        let current = controller.start().unwrap();

        assert_eq!(controller.tick_run(old, ms(5_000)), TickOutcome::Ignored);
        assert_eq!(controller.state().remaining_ms, 15_000);
        assert_eq!(controller.tick_run(current, ms(5_000)), TickOutcome::Running);
        assert_eq!(controller.state().remaining_ms, 10_000);
    }

    #[test]
    fn add_then_remove_is_symmetric() {
        let mut controller = CountdownController::default();
        assert!(controller.adjust_duration(1_000));
        assert_eq!(controller.state().total_duration_ms, 16_000);
        assert!(controller.adjust_duration(-1_000));
        assert_eq!(controller.state().total_duration_ms, 15_000);
    }

    #[test]
    fn decrement_never_reaches_zero() {
        let mut controller = CountdownController::new(1_000);
        assert!(!controller.adjust_duration(-1_000));
        assert_eq!(controller.state().total_duration_ms, 1_000);
        assert!(!controller.remove_time());
        assert_eq!(controller.state().total_duration_ms, 1_000);
    }

    #[test]
    fn adjusting_while_running_stops_first() {
        let mut controller = CountdownController::default();
        controller.start();
        controller.tick(ms(3_000));
        assert!(controller.add_time());
        assert_eq!(controller.state(), &CountdownState::idle(16_000));
        assert!(controller.active_run().is_none());
    }

    #[test]
    fn refused_decrement_still_stops_the_run() {
        let mut controller = CountdownController::new(1_000);
        controller.start();
        controller.tick(ms(500));
        assert!(!controller.remove_time());
        assert_eq!(controller.state(), &CountdownState::idle(1_000));
    }

    #[test]
    fn custom_step_is_used() {
        let mut controller = CountdownController::with_step(15_000, 5_000);
        controller.add_time();
        assert_eq!(controller.state().total_duration_ms, 20_000);
        controller.remove_time();
        controller.remove_time();
        assert_eq!(controller.state().total_duration_ms, 10_000);
    }

    #[test]
    fn increment_from_zero_allows_starting() {
        let mut controller = CountdownController::new(0);
        controller.add_time();
        assert_eq!(controller.state().total_duration_ms, 1_000);
        assert!(controller.start().is_some());
    }
}
