//! Countdown lifecycle notifications

use serde::{Deserialize, Serialize};

/// Transitions announced on the event channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CountdownEvent {
    Started { total_duration_ms: u64 },
    Stopped { total_duration_ms: u64 },
    Finished { total_duration_ms: u64 },
    DurationAdjusted { total_duration_ms: u64 },
}

impl CountdownEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Stopped { .. } => "stopped",
            Self::Finished { .. } => "finished",
            Self::DurationAdjusted { .. } => "duration_adjusted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_string(&CountdownEvent::Finished { total_duration_ms: 15_000 }).unwrap();
        assert_eq!(json, r#"{"event":"finished","total_duration_ms":15000}"#);
    }
}
