//! Claim/ack/fail API over the outbox.

use sqlx::PgPool;

use crate::domain::OutboxItem;
use crate::repos::{dead_letter_repo, outbox_repo};
use crate::repos::outbox_repo::FailOutcome;

#[derive(Debug, Clone)]
pub struct Queue {
    pool: PgPool,
    max_retries: i32,
}

impl Queue {
    pub fn new(pool: PgPool, max_retries: i32) -> Self {
        Self { pool, max_retries }
    }

    /// Claim up to `limit` pending items. No item is ever returned to more
    /// than one concurrent caller.
    pub async fn claim(&self, limit: i64) -> Result<Vec<OutboxItem>, sqlx::Error> {
        outbox_repo::claim_next(&self.pool, limit).await
    }

    pub async fn mark_processed(&self, id: i64) -> Result<(), sqlx::Error> {
        outbox_repo::mark_processed(&self.pool, id).await
    }

    /// Fail an item. Re-queues to `pending` unless retries are exhausted,
    /// in which case it is dead-lettered.
    pub async fn mark_failed(&self, item: &OutboxItem, error: &str) -> Result<(), sqlx::Error> {
        let outcome = outbox_repo::mark_failed(&self.pool, item.id, error, self.max_retries).await?;
        if outcome == FailOutcome::DeadLettered {
            dead_letter_repo::insert(&self.pool, item.id, item.event_db_id, error, item.attempts)
                .await?;
        }
        Ok(())
    }
}
