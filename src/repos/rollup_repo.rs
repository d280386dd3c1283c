use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::ClassRollup;

pub async fn upsert(
    pool: &PgPool,
    class_id: &str,
    completion_rate: f64,
    avg_score: Option<f64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO class_rollups (class_id, completion_rate, avg_score, updated_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (class_id)
        DO UPDATE SET completion_rate = $2, avg_score = $3, updated_at = NOW()
        "#,
    )
    .bind(class_id)
    .bind(completion_rate)
    .bind(avg_score)
    .execute(pool)
    .await?;

    Ok(())
}

/// Rollup reads never produce not-found; an absent row is a zero rollup.
pub async fn get(pool: &PgPool, class_id: &str) -> Result<ClassRollup, sqlx::Error> {
    let row: Option<(String, f64, Option<f64>, DateTime<Utc>)> = sqlx::query_as(
        "SELECT class_id, completion_rate, avg_score, updated_at FROM class_rollups WHERE class_id = $1",
    )
    .bind(class_id)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some((class_id, completion_rate, avg_score, updated_at)) => ClassRollup {
            class_id,
            completion_rate,
            avg_score,
            updated_at,
        },
        None => ClassRollup::zero(class_id),
    })
}
