use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::SetField;
use crate::timer::TimerPhase;

/// Every state change in the system produces an Event.
/// The presentation layer polls for events; nothing is pushed to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RestStarted {
        target_secs: u32,
        /// A countdown was already running and got replaced.
        replaced: bool,
        at: DateTime<Utc>,
    },
    RestStopped {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    RestFinished {
        target_secs: u32,
        at: DateTime<Utc>,
    },
    RestSnapshot {
        phase: TimerPhase,
        target_secs: Option<u32>,
        remaining_secs: u32,
        remaining_ms: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    WorkoutStarted {
        session_id: Uuid,
        template: String,
        exercise_count: usize,
        at: DateTime<Utc>,
    },
    SetUpdated {
        exercise: String,
        set_number: u32,
        field: SetField,
        at: DateTime<Utc>,
    },
    SetToggled {
        exercise: String,
        set_number: u32,
        completed: bool,
        at: DateTime<Utc>,
    },
    ExerciseSelected {
        index: usize,
        exercise: String,
        at: DateTime<Utc>,
    },
    RestDurationChanged {
        secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutFinished {
        session_id: Uuid,
        completed_sets: usize,
        total_sets: usize,
        at: DateTime<Utc>,
    },
    WorkoutAbandoned {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::RestStarted {
            target_secs: 90,
            replaced: false,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "RestStarted");
        assert_eq!(json["target_secs"], 90);
    }
}
