//! Event vocabulary streamed to view surfaces
//!
//! The server emits these over SSE; a browser terminal reconciles
//! `OutputUpdate` events against the generation key exactly like the
//! in-process `TerminalReconciler` does.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted { generation: u64 },
    OutputUpdate { generation: u64, content: String },
    RunFinished { generation: u64 },
    RunError { generation: u64, message: String },
    PreviewRefreshed { refresh_key: u64 },
}

impl RunEvent {
    /// SSE event name for this variant.
    pub fn event_name(&self) -> &'static str {
        match self {
            RunEvent::RunStarted { .. } => "RUN_STARTED",
            RunEvent::OutputUpdate { .. } => "OUTPUT_UPDATE",
            RunEvent::RunFinished { .. } => "RUN_FINISHED",
            RunEvent::RunError { .. } => "RUN_ERROR",
            RunEvent::PreviewRefreshed { .. } => "PREVIEW_REFRESHED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_shape() {
        let event = RunEvent::OutputUpdate {
            generation: 3,
            content: "hi".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "output_update");
        assert_eq!(json["generation"], 3);
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_event_names() {
        assert_eq!(
            RunEvent::RunStarted { generation: 1 }.event_name(),
            "RUN_STARTED"
        );
        assert_eq!(
            RunEvent::PreviewRefreshed { refresh_key: 1 }.event_name(),
            "PREVIEW_REFRESHED"
        );
    }

    #[test]
    fn test_round_trip() {
        let event = RunEvent::RunError {
            generation: 2,
            message: "Simulation error: quota".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: RunEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
