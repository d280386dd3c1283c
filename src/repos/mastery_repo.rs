use sqlx::PgPool;

use crate::domain::StandardMastery;

/// Latest-writer-wins upsert of a student's mastery for one standard.
pub async fn upsert(
    pool: &PgPool,
    student_id: &str,
    standard_id: &str,
    mastery_score: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO student_mastery (student_id, standard_id, mastery_score, updated_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (student_id, standard_id)
        DO UPDATE SET mastery_score = $3, updated_at = NOW()
        "#,
    )
    .bind(student_id)
    .bind(standard_id)
    .bind(mastery_score)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_by_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<StandardMastery>, sqlx::Error> {
    let rows: Vec<(String, f64)> = sqlx::query_as(
        "SELECT standard_id, mastery_score FROM student_mastery WHERE student_id = $1 ORDER BY standard_id",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(standard_id, mastery_score)| StandardMastery {
            standard_id,
            mastery_score,
        })
        .collect())
}
