//! Wire and stored shapes for learning events.
//!
//! `IncomingEvent` is the untrusted payload producers submit. `Event` is the
//! immutable row written to the event store once the incoming payload has
//! been classified and deduplicated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three event kinds the classifier can resolve an incoming event to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    AssignmentAssigned,
    SubmissionCreated,
    SubmissionGraded,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AssignmentAssigned => "ASSIGNMENT_ASSIGNED",
            EventType::SubmissionCreated => "SUBMISSION_CREATED",
            EventType::SubmissionGraded => "SUBMISSION_GRADED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ASSIGNMENT_ASSIGNED" => Some(EventType::AssignmentAssigned),
            "SUBMISSION_CREATED" => Some(EventType::SubmissionCreated),
            "SUBMISSION_GRADED" => Some(EventType::SubmissionGraded),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The untrusted payload accepted at the ingest boundary.
///
/// Field names are load-bearing: the classifier and all downstream
/// projections read them back out of the canonical JSON payload stored on
/// the event row, so renaming a field here is a wire-format break.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomingEvent {
    pub event_id: String,
    pub source: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub student_id: String,
    pub class_id: String,
    #[serde(default)]
    pub assignment_id: String,
    #[serde(default)]
    pub standard_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// An immutable row in the event store. Never mutated after insert.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: i64,
    pub event_id: String,
    pub source: String,
    pub r#type: EventType,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
