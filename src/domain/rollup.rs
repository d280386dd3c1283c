use chrono::{DateTime, Utc};

/// Per-class completion and scoring snapshot, recomputed from the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRollup {
    pub class_id: String,
    pub completion_rate: f64,
    pub avg_score: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl ClassRollup {
    /// The rollup returned when no row exists yet for a class: zero
    /// completion, not a "not found" error.
    pub fn zero(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            completion_rate: 0.0,
            avg_score: None,
            updated_at: Utc::now(),
        }
    }
}
