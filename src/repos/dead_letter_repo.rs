//! Quarantine table for outbox items that exhausted `MAX_RETRIES`.
//!
//! Append-only, operational visibility only; never read by the dashboard.

use sqlx::PgPool;

pub async fn insert(
    pool: &PgPool,
    outbox_id: i64,
    event_db_id: i64,
    error: &str,
    attempts: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO dead_letters (outbox_id, event_db_id, error, attempts, failed_at)
        VALUES ($1, $2, $3, $4, NOW())
        "#,
    )
    .bind(outbox_id)
    .bind(event_db_id)
    .bind(error)
    .bind(attempts)
    .execute(pool)
    .await?;

    Ok(())
}
