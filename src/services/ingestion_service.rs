//! Idempotent ingestion: validate, classify, and atomically write the
//! event store + outbox in one transaction.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::domain::{EventType, IncomingEvent};
use crate::metrics::Metrics;
use crate::repos::{event_repo, outbox_repo};
use crate::validation::{canonical_payload, validate_and_classify, ValidationError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Result of a successful ingest call. `event_db_id` is stable across
/// retries of the same `(source, event_id)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub event_type: EventType,
    pub event_db_id: i64,
}

pub struct IngestionService {
    pool: PgPool,
    metrics: Arc<Metrics>,
}

impl IngestionService {
    pub fn new(pool: PgPool, metrics: Arc<Metrics>) -> Self {
        Self { pool, metrics }
    }

    /// Validate, classify, and idempotently persist one incoming event.
    ///
    /// Duplicates on `(source, event_id)` return the pre-existing
    /// `event_db_id` with no additional side effect, making this safely
    /// retriable by producers.
    pub async fn ingest(&self, incoming: &IncomingEvent) -> Result<IngestOutcome, IngestError> {
        let timer = Metrics::timer();

        let event_type = match validate_and_classify(incoming) {
            Ok(t) => t,
            Err(e) => {
                self.metrics
                    .events_ingested_total
                    .with_label_values(&["unknown", "validation_error"])
                    .inc();
                return Err(e.into());
            }
        };

        let payload = canonical_payload(incoming);

        let mut tx = self.pool.begin().await.map_err(IngestError::from)?;

        let (event_db_id, inserted) = match event_repo::insert_or_get(
            &mut tx,
            &incoming.event_id,
            &incoming.source,
            event_type,
            &payload,
        )
        .await
        {
            Ok(v) => v,
            Err(e) => {
                self.metrics
                    .events_ingested_total
                    .with_label_values(&[event_type.as_str(), "error"])
                    .inc();
                return Err(e.into());
            }
        };

        if inserted {
            if let Err(e) = outbox_repo::insert_pending(&mut tx, event_db_id).await {
                self.metrics
                    .events_ingested_total
                    .with_label_values(&[event_type.as_str(), "error"])
                    .inc();
                return Err(e.into());
            }
        }

        tx.commit().await.map_err(IngestError::from)?;

        self.metrics
            .events_ingested_total
            .with_label_values(&[event_type.as_str(), "ok"])
            .inc();
        self.metrics
            .ingest_latency_seconds
            .with_label_values(&["ok"])
            .observe(timer.elapsed().as_secs_f64());

        Ok(IngestOutcome {
            event_type,
            event_db_id,
        })
    }
}

#[cfg(test)]
mod tests {
    // Transactional behavior is covered by the DB-backed integration tests
    // under tests/ (ingestion_idempotence_test.rs); this module stays free
    // of pure-function tests since every branch here touches the pool.
}
