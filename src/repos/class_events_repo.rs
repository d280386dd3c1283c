//! Minimal per-event projections read straight off the event log, the
//! source of truth derivations recompute from.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::EventType;

/// The subset of an event's payload the rollup/risk derivations need.
#[derive(Debug, Clone)]
pub struct ClassEventRow {
    pub r#type: EventType,
    pub student_id: String,
    pub assignment_id: String,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Every distinct non-empty `class_id` referenced in the event log. Used
/// by the projection rebuild tool to enumerate what to recompute.
pub async fn distinct_class_ids(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT payload->>'class_id' AS class_id
        FROM events
        WHERE payload->>'class_id' IS NOT NULL AND payload->>'class_id' != ''
        ORDER BY class_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(class_id,)| class_id).collect())
}

/// All events belonging to a class, oldest first. O(events-per-class); the
/// derivations are recompute-from-log by design.
pub async fn list_for_class(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<ClassEventRow>, sqlx::Error> {
    let rows: Vec<(String, String, String, Option<f64>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT type,
               payload->>'student_id' AS student_id,
               COALESCE(payload->>'assignment_id', '') AS assignment_id,
               (payload->>'score')::float8 AS score,
               created_at
        FROM events
        WHERE payload->>'class_id' = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(class_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(r#type, student_id, assignment_id, score, created_at)| ClassEventRow {
            r#type: EventType::from_str(&r#type).expect("stored type is always valid"),
            student_id,
            assignment_id,
            score,
            created_at,
        })
        .collect())
}
