use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::RecentActivity;

/// Most recent events across an entire class, newest first.
pub async fn recent_for_class(
    pool: &PgPool,
    class_id: &str,
    limit: i64,
) -> Result<Vec<RecentActivity>, sqlx::Error> {
    let rows: Vec<(String, Option<String>, Option<String>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT type,
               payload->>'student_id' AS student_id,
               payload->>'assignment_id' AS assignment_id,
               created_at
        FROM events
        WHERE payload->>'class_id' = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(class_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(event_type, student_id, assignment_id, created_at)| RecentActivity {
            event_type,
            student_id: student_id.unwrap_or_default(),
            assignment_id: assignment_id.unwrap_or_default(),
            created_at,
        })
        .collect())
}
