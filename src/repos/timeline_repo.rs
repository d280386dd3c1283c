use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::TimelineEvent;

/// Most recent events for one (student, class) pair, newest first.
pub async fn recent_for_student_class(
    pool: &PgPool,
    student_id: &str,
    class_id: &str,
    limit: i64,
) -> Result<Vec<TimelineEvent>, sqlx::Error> {
    let rows: Vec<(String, Option<String>, Option<f64>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT type,
               payload->>'assignment_id' AS assignment_id,
               (payload->>'score')::float8 AS score,
               created_at
        FROM events
        WHERE payload->>'student_id' = $1 AND payload->>'class_id' = $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(student_id)
    .bind(class_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(event_type, assignment_id, score, created_at)| TimelineEvent {
            event_type,
            assignment_id: assignment_id.unwrap_or_default(),
            score,
            created_at,
        })
        .collect())
}
