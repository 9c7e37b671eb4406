//! Shared countdown session state

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{config::TimerSettings, tasks::countdown_tick_task};
use super::{CountdownController, CountdownEvent, CountdownState, RunId, TickOutcome};

/// Shortest period the tick task runs at
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Owns the countdown controller, its tick task and the channels observers
/// subscribe to
#[derive(Debug)]
pub struct AppState {
    controller: Mutex<CountdownController>,
    /// Handle of the task currently delivering ticks
    tick_task: Mutex<Option<JoinHandle<()>>>,
    pub settings: TimerSettings,
    /// Session metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for lifecycle notifications
    pub event_tx: broadcast::Sender<CountdownEvent>,
    /// Channel carrying every state change
    state_tx: watch::Sender<CountdownState>,
    /// Keep the receiver alive to prevent channel closure
    _state_rx: watch::Receiver<CountdownState>,
}

impl AppState {
    pub fn new(mut settings: TimerSettings) -> Self {
        if settings.tick_period < MIN_TICK_PERIOD {
            warn!("Tick period {:?} raised to {:?}", settings.tick_period, MIN_TICK_PERIOD);
            settings.tick_period = MIN_TICK_PERIOD;
        }
        let controller = CountdownController::with_step(settings.initial_duration_ms, settings.step_ms);
        let (event_tx, _) = broadcast::channel(100);
        let (state_tx, state_rx) = watch::channel(controller.state().clone());

        Self {
            controller: Mutex::new(controller),
            tick_task: Mutex::new(None),
            settings,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            state_tx,
            _state_rx: state_rx,
        }
    }

    /// Receive every published countdown state
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state_tx.subscribe()
    }

    /// Receive lifecycle events
    pub fn subscribe_events(&self) -> broadcast::Receiver<CountdownEvent> {
        self.event_tx.subscribe()
    }

    /// Get the current countdown state
    pub fn snapshot(&self) -> Result<CountdownState, String> {
        self.controller.lock()
            .map(|controller| controller.state().clone())
            .map_err(|e| format!("Failed to lock countdown controller: {}", e))
    }

    /// Start counting down and spawn the tick task. No-op when running.
    pub fn start(self: &Arc<Self>) -> Result<CountdownState, String> {
        let (started, state) = self.update_controller("start", |controller, tick_task| {
            let Some(run) = controller.start() else {
                return false;
            };
            let task_state = Arc::clone(self);
            let handle = tokio::spawn(async move {
                countdown_tick_task(task_state, run).await;
            });
            replace_tick_task(tick_task, Some(handle));
            true
        })?;

        if started {
            self.notify(CountdownEvent::Started { total_duration_ms: state.total_duration_ms });
        }
        Ok(state)
    }

    /// Stop counting down and reset to the full duration. No-op when idle.
    pub fn stop(&self) -> Result<CountdownState, String> {
        let (stopped, state) = self.update_controller("stop", |controller, tick_task| {
            let stopped = controller.stop();
            replace_tick_task(tick_task, None);
            stopped
        })?;

        if stopped {
            self.notify(CountdownEvent::Stopped { total_duration_ms: state.total_duration_ms });
        }
        Ok(state)
    }

    /// Start when idle, stop when running
    pub fn toggle(self: &Arc<Self>) -> Result<CountdownState, String> {
        if self.snapshot()?.is_running {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Stop any run and change the duration by `delta_ms`
    pub fn adjust_duration(&self, delta_ms: i64) -> Result<CountdownState, String> {
        let action = if delta_ms >= 0 { "add-time" } else { "remove-time" };
        self.apply_adjustment(action, |controller| controller.adjust_duration(delta_ms))
    }

    pub fn add_time(&self) -> Result<CountdownState, String> {
        self.apply_adjustment("add-time", |controller| controller.add_time())
    }

    pub fn remove_time(&self) -> Result<CountdownState, String> {
        self.apply_adjustment("remove-time", |controller| controller.remove_time())
    }

    /// Deliver elapsed time on behalf of `run`
    pub(crate) fn deliver_tick(&self, run: RunId, elapsed: Duration) -> Result<TickOutcome, String> {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock countdown controller: {}", e))?;

        let outcome = controller.tick_run(run, elapsed);
        let new_state = controller.state().clone();
        drop(controller);

        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Running => self.publish(new_state),
            TickOutcome::Finished => {
                let total_duration_ms = new_state.total_duration_ms;
                self.publish(new_state);
                self.notify(CountdownEvent::Finished { total_duration_ms });
            }
        }

        Ok(outcome)
    }

    /// Tear the session down so no further ticks are delivered
    pub fn shutdown(&self) -> Result<(), String> {
        info!("Shutting down countdown session");
        self.stop()?;
        Ok(())
    }

    /// Whether a tick task is still alive
    pub fn tick_task_active(&self) -> bool {
        self.tick_task.lock()
            .map(|task| task.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Calculate session uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn apply_adjustment<F>(&self, action: &str, adjust: F) -> Result<CountdownState, String>
    where
        F: FnOnce(&mut CountdownController) -> bool,
    {
        let ((stopped_run_ms, changed), state) = self.update_controller(action, |controller, tick_task| {
            let stopped_run_ms = controller.is_running().then(|| controller.state().total_duration_ms);
            let changed = adjust(controller);
            replace_tick_task(tick_task, None);
            (stopped_run_ms, changed)
        })?;

        if let Some(total_duration_ms) = stopped_run_ms {
            self.notify(CountdownEvent::Stopped { total_duration_ms });
        }
        if changed {
            self.notify(CountdownEvent::DurationAdjusted { total_duration_ms: state.total_duration_ms });
        }
        Ok(state)
    }

    /// Apply an operation to the controller and its tick task, then publish
    /// the resulting state.
    ///
    /// Both locks are held for the whole update (controller first), so the
    /// stored task always belongs to the controller's active run.
    fn update_controller<F, R>(&self, action: &str, updater: F) -> Result<(R, CountdownState), String>
    where
        F: FnOnce(&mut CountdownController, &mut Option<JoinHandle<()>>) -> R,
    {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock countdown controller: {}", e))?;
        let mut tick_task = self.tick_task.lock()
            .map_err(|e| format!("Failed to lock tick task: {}", e))?;

        let result = updater(&mut *controller, &mut *tick_task);
        let new_state = controller.state().clone();
        drop(tick_task);
        drop(controller); // Release the locks early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(new_state.clone());
        Ok((result, new_state))
    }

    fn publish(&self, state: CountdownState) {
        if let Err(e) = self.state_tx.send(state) {
            warn!("Failed to publish countdown state: {}", e);
        }
    }

    fn notify(&self, event: CountdownEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No event subscribers");
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

/// Swap the stored tick task, aborting the previous one
fn replace_tick_task(task: &mut Option<JoinHandle<()>>, handle: Option<JoinHandle<()>>) {
    if let Some(previous) = std::mem::replace(task, handle) {
        if !previous.is_finished() {
            debug!("Aborting tick task");
        }
        previous.abort();
    }
}
