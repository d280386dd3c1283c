//! Class rollup derivation: recompute-from-log, not incremental.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::domain::EventType;
use crate::repos::class_events_repo::{self, ClassEventRow};
use crate::repos::rollup_repo;

pub struct RollupService {
    pool: PgPool,
}

impl RollupService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recompute and upsert the rollup for one class from its full event log.
    pub async fn recompute(&self, class_id: &str) -> Result<(), sqlx::Error> {
        let events = class_events_repo::list_for_class(&self.pool, class_id).await?;
        let (completion_rate, avg_score) = compute_rollup(&events);
        rollup_repo::upsert(&self.pool, class_id, completion_rate, avg_score).await
    }
}

/// `(completion_rate, avg_score)` for one class's worth of events:
/// `completion_rate` is the ratio of distinct graded
/// `(student_id, assignment_id)` pairs over distinct assigned pairs, 0
/// when nothing is assigned, clamped to `[0, 1]`; `avg_score` is the mean
/// score across `SUBMISSION_GRADED` events, or `None` when there are none.
fn compute_rollup(events: &[ClassEventRow]) -> (f64, Option<f64>) {
    let mut assigned: HashSet<(&str, &str)> = HashSet::new();
    let mut graded: HashSet<(&str, &str)> = HashSet::new();
    let mut score_sum = 0.0;
    let mut score_count: u64 = 0;

    for event in events {
        let pair = (event.student_id.as_str(), event.assignment_id.as_str());
        match event.r#type {
            EventType::AssignmentAssigned => {
                assigned.insert(pair);
            }
            EventType::SubmissionGraded => {
                graded.insert(pair);
                if let Some(score) = event.score {
                    score_sum += score;
                    score_count += 1;
                }
            }
            EventType::SubmissionCreated => {}
        }
    }

    let completion_rate = if assigned.is_empty() {
        0.0
    } else {
        (graded.len() as f64 / assigned.len() as f64).clamp(0.0, 1.0)
    };

    let avg_score = if score_count == 0 {
        None
    } else {
        Some(score_sum / score_count as f64)
    };

    (completion_rate, avg_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(r#type: EventType, student: &str, assignment: &str, score: Option<f64>) -> ClassEventRow {
        ClassEventRow {
            r#type,
            student_id: student.to_string(),
            assignment_id: assignment.to_string(),
            score,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn zero_assigned_yields_zero_completion_and_no_avg() {
        let (rate, avg) = compute_rollup(&[]);
        assert_eq!(rate, 0.0);
        assert_eq!(avg, None);
    }

    #[test]
    fn completion_rate_counts_distinct_pairs() {
        let events = vec![
            row(EventType::AssignmentAssigned, "s1", "a1", None),
            row(EventType::AssignmentAssigned, "s1", "a2", None),
            row(EventType::AssignmentAssigned, "s2", "a1", None),
            row(EventType::SubmissionGraded, "s1", "a1", Some(90.0)),
            // Duplicate grading event for the same pair must not double-count.
            row(EventType::SubmissionGraded, "s1", "a1", Some(95.0)),
        ];
        let (rate, avg) = compute_rollup(&events);
        assert_eq!(rate, 1.0 / 3.0);
        assert_eq!(avg, Some((90.0 + 95.0) / 2.0));
    }

    #[test]
    fn no_graded_events_yields_no_avg_score() {
        let events = vec![row(EventType::AssignmentAssigned, "s1", "a1", None)];
        let (_, avg) = compute_rollup(&events);
        assert_eq!(avg, None);
    }
}
