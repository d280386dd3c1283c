use chrono::{DateTime, Utc};

/// Lifecycle state of an outbox item.
///
/// `DeadLetter` is the one addition over spec: an item that exhausted
/// `MAX_RETRIES` claims stops being claimable instead of looping forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Processing,
    Processed,
    DeadLetter,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Processing => "processing",
            OutboxStatus::Processed => "processed",
            OutboxStatus::DeadLetter => "dead_letter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OutboxStatus::Pending),
            "processing" => Some(OutboxStatus::Processing),
            "processed" => Some(OutboxStatus::Processed),
            "dead_letter" => Some(OutboxStatus::DeadLetter),
            _ => None,
        }
    }
}

/// A single unit of asynchronous work tied to one event row.
#[derive(Debug, Clone)]
pub struct OutboxItem {
    pub id: i64,
    pub event_db_id: i64,
    pub status: OutboxStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
