//! Console reply structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, CountdownState, DisplayModel};

/// Result of handling one console command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum CommandReply {
    Action(ActionResponse),
    Status(StatusReport),
    Help { text: &'static str },
}

impl CommandReply {
    pub fn action(message: String, countdown: CountdownState) -> Self {
        Self::Action(ActionResponse::new(message, countdown))
    }
}

/// Response to a start/stop/adjust command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownState,
    pub display: DisplayModel,
}

impl ActionResponse {
    pub fn new(message: String, countdown: CountdownState) -> Self {
        let status = if countdown.is_running { "running" } else { "idle" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            display: DisplayModel::from(&countdown),
            countdown,
        }
    }
}

/// Status with session information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub countdown: CountdownState,
    pub display: DisplayModel,
    pub tick_period_ms: u64,
    pub step_ms: u64,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl StatusReport {
    pub fn new(state: &AppState, countdown: CountdownState) -> Self {
        let (last_action, last_action_time) = state.get_last_action();
        Self {
            display: DisplayModel::from(&countdown),
            countdown,
            tick_period_ms: u64::try_from(state.settings.tick_period.as_millis()).unwrap_or(u64::MAX),
            step_ms: state.settings.step_ms,
            uptime: state.get_uptime(),
            last_action,
            last_action_time,
        }
    }
}
