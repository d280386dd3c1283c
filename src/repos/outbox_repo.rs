//! The outbox table: transactional enqueue, FOR UPDATE SKIP LOCKED claim,
//! and the processed/failed/dead-letter transitions.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{OutboxItem, OutboxStatus};

/// Insert one pending outbox item for an event row, in the same
/// transaction as the event insert.
pub async fn insert_pending(
    tx: &mut Transaction<'_, Postgres>,
    event_db_id: i64,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO event_outbox (event_db_id, status, attempts)
        VALUES ($1, 'pending', 0)
        RETURNING id
        "#,
    )
    .bind(event_db_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

fn row_to_item(
    row: (
        i64,
        i64,
        String,
        i32,
        Option<String>,
        DateTime<Utc>,
        Option<DateTime<Utc>>,
    ),
) -> OutboxItem {
    OutboxItem {
        id: row.0,
        event_db_id: row.1,
        status: OutboxStatus::from_str(&row.2).expect("stored status is always valid"),
        attempts: row.3,
        last_error: row.4,
        created_at: row.5,
        processed_at: row.6,
    }
}

/// Atomically claim up to `limit` pending items in FIFO order and move
/// them to `processing`, incrementing `attempts`.
///
/// `FOR UPDATE SKIP LOCKED` guarantees no item is returned to more than
/// one concurrent caller.
pub async fn claim_next(pool: &PgPool, limit: i64) -> Result<Vec<OutboxItem>, sqlx::Error> {
    let rows: Vec<(
        i64,
        i64,
        String,
        i32,
        Option<String>,
        DateTime<Utc>,
        Option<DateTime<Utc>>,
    )> = sqlx::query_as(
        r#"
        WITH to_claim AS (
            SELECT id FROM event_outbox
            WHERE status = 'pending'
            ORDER BY id
            LIMIT $1
            FOR UPDATE SKIP LOCKED
        )
        UPDATE event_outbox
        SET status = 'processing', attempts = attempts + 1
        WHERE id IN (SELECT id FROM to_claim)
        RETURNING id, event_db_id, status, attempts, last_error, created_at, processed_at
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_item).collect())
}

pub async fn mark_processed(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE event_outbox SET status = 'processed', processed_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Result of `mark_failed`: whether the item was re-queued or moved to the
/// dead letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOutcome {
    Requeued,
    DeadLettered,
}

/// Fail an item. Re-queues it to `pending` unless `attempts` has reached
/// `max_retries`, in which case it moves to the terminal `dead_letter`
/// status.
pub async fn mark_failed(
    pool: &PgPool,
    id: i64,
    error: &str,
    max_retries: i32,
) -> Result<FailOutcome, sqlx::Error> {
    let (attempts,): (i32,) =
        sqlx::query_as("SELECT attempts FROM event_outbox WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    if attempts >= max_retries {
        sqlx::query(
            "UPDATE event_outbox SET status = 'dead_letter', last_error = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(FailOutcome::DeadLettered)
    } else {
        sqlx::query(
            "UPDATE event_outbox SET status = 'pending', last_error = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(FailOutcome::Requeued)
    }
}
