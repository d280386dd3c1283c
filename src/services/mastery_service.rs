//! Mastery derivation: latest-writer-wins per (student, standard). Upserts
//! the new score as soon as a submission is graded.

use sqlx::PgPool;

use crate::domain::IncomingEvent;
use crate::repos::mastery_repo;

pub struct MasteryService {
    pool: PgPool,
    max_score: f64,
}

impl MasteryService {
    pub fn new(pool: PgPool, max_score: f64) -> Self {
        Self { pool, max_score }
    }

    /// Upsert `clamp(score, 0, max_score) / max_score` for every standard
    /// on a graded event. A no-op when there's no score or no standards.
    pub async fn update_from_graded_event(
        &self,
        incoming: &IncomingEvent,
    ) -> Result<(), sqlx::Error> {
        let Some(score) = incoming.score else {
            return Ok(());
        };
        if incoming.standard_ids.is_empty() {
            return Ok(());
        }

        let mastery_score = clamp_mastery(score, self.max_score);

        for standard_id in &incoming.standard_ids {
            mastery_repo::upsert(&self.pool, &incoming.student_id, standard_id, mastery_score)
                .await?;
        }

        Ok(())
    }
}

fn clamp_mastery(score: f64, max_score: f64) -> f64 {
    score.clamp(0.0, max_score) / max_score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_below_zero() {
        assert_eq!(clamp_mastery(-10.0, 100.0), 0.0);
    }

    #[test]
    fn clamps_above_max() {
        assert_eq!(clamp_mastery(150.0, 100.0), 1.0);
    }

    #[test]
    fn maps_midpoint() {
        assert_eq!(clamp_mastery(80.0, 100.0), 0.8);
    }
}
