//! Countdown tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, RunId, TickOutcome};

/// Background task that feeds elapsed time to one countdown run until it
/// finishes, is stopped, or is superseded by a newer run
pub async fn countdown_tick_task(state: Arc<AppState>, run: RunId) {
    let period = state.settings.tick_period;
    debug!("Starting tick task for {:?} with period {:?}", run, period);

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick of an interval completes immediately
    interval.tick().await;
    let started = Instant::now();
    let mut delivered_ms: u64 = 0;

    loop {
        interval.tick().await;

        // Measure from the run start so truncated milliseconds never add up
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let delta_ms = elapsed_ms.saturating_sub(delivered_ms);
        delivered_ms = elapsed_ms;

        match state.deliver_tick(run, Duration::from_millis(delta_ms)) {
            Ok(TickOutcome::Running) => {}
            Ok(TickOutcome::Finished) => {
                info!("Countdown run {:?} finished", run);
                break;
            }
            Ok(TickOutcome::Ignored) => {
                debug!("Run {:?} no longer active, stopping tick task", run);
                break;
            }
            Err(e) => {
                error!("Failed to deliver tick: {}", e);
                break;
            }
        }
    }
}
