use std::collections::HashMap;

use sqlx::PgPool;

use crate::domain::{AtRiskStudent, RiskReason};

pub async fn upsert(
    pool: &PgPool,
    student_id: &str,
    class_id: &str,
    reason: RiskReason,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO risk_flags (student_id, class_id, reason, computed_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (student_id, class_id, reason)
        DO UPDATE SET computed_at = NOW()
        "#,
    )
    .bind(student_id)
    .bind(class_id)
    .bind(reason.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete all flags for a class before the full recompute.
pub async fn delete_for_class(pool: &PgPool, class_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM risk_flags WHERE class_id = $1")
        .bind(class_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_by_class(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<AtRiskStudent>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT student_id, reason FROM risk_flags WHERE class_id = $1 ORDER BY student_id",
    )
    .bind(class_id)
    .fetch_all(pool)
    .await?;

    let mut by_student: HashMap<String, Vec<String>> = HashMap::new();
    for (student_id, reason) in rows {
        by_student.entry(student_id).or_default().push(reason);
    }

    let mut out: Vec<AtRiskStudent> = by_student
        .into_iter()
        .map(|(student_id, reasons)| AtRiskStudent {
            student_id,
            reasons,
        })
        .collect();
    out.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    Ok(out)
}
