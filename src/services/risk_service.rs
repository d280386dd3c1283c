//! Risk flag derivation: delete-then-recompute per class.

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use crate::domain::{EventType, RiskReason};
use crate::repos::class_events_repo::{self, ClassEventRow};
use crate::repos::risk_repo;

pub struct RiskService {
    pool: PgPool,
}

impl RiskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete all flags for the class, then independently recompute and
    /// insert each of the three heuristics.
    pub async fn recompute(&self, class_id: &str) -> Result<(), sqlx::Error> {
        let events = class_events_repo::list_for_class(&self.pool, class_id).await?;
        let flags = compute_risk(&events);

        risk_repo::delete_for_class(&self.pool, class_id).await?;
        for (student_id, reason) in &flags {
            risk_repo::upsert(&self.pool, student_id, class_id, *reason).await?;
        }
        Ok(())
    }
}

/// `(student_id, reason)` pairs for one class's worth of events. A student
/// may appear more than once, once per matched heuristic.
fn compute_risk(events: &[ClassEventRow]) -> Vec<(String, RiskReason)> {
    let mut flags = Vec::new();
    flags.extend(missing_submissions(events));
    flags.extend(completion_below_median(events));
    flags.extend(score_trend_down(events));
    flags
}

fn missing_submissions(events: &[ClassEventRow]) -> Vec<(String, RiskReason)> {
    let mut assigned: HashSet<&str> = HashSet::new();
    let mut graded: HashSet<&str> = HashSet::new();
    for event in events {
        match event.r#type {
            EventType::AssignmentAssigned => {
                assigned.insert(&event.student_id);
            }
            EventType::SubmissionGraded => {
                graded.insert(&event.student_id);
            }
            EventType::SubmissionCreated => {}
        }
    }

    let mut students: Vec<&&str> = assigned.difference(&graded).collect();
    students.sort();
    students
        .into_iter()
        .map(|s| (s.to_string(), RiskReason::MissingSubmissions))
        .collect()
}

fn completion_below_median(events: &[ClassEventRow]) -> Vec<(String, RiskReason)> {
    let mut assigned: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut graded: HashMap<&str, HashSet<&str>> = HashMap::new();

    for event in events {
        let bucket = match event.r#type {
            EventType::AssignmentAssigned => &mut assigned,
            EventType::SubmissionGraded => &mut graded,
            EventType::SubmissionCreated => continue,
        };
        bucket
            .entry(event.student_id.as_str())
            .or_default()
            .insert(event.assignment_id.as_str());
    }

    let mut rates: Vec<(&str, f64)> = assigned
        .iter()
        .filter(|(_, a)| !a.is_empty())
        .map(|(student, a)| {
            let g = graded.get(student).map(HashSet::len).unwrap_or(0);
            (*student, g as f64 / a.len() as f64)
        })
        .collect();

    if rates.is_empty() {
        return Vec::new();
    }

    let median = median_of(rates.iter().map(|(_, r)| *r).collect());

    rates.sort_by(|a, b| a.0.cmp(b.0));
    rates
        .into_iter()
        .filter(|(_, rate)| *rate < median)
        .map(|(student, _)| (student.to_string(), RiskReason::CompletionBelowMedian))
        .collect()
}

/// Standard 0-indexed median: average of the two middle entries on an even
/// count, the single middle entry on an odd count. `values` is sorted here.
fn median_of(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).expect("completion rates are never NaN"));
    let cnt = values.len();
    if cnt % 2 == 0 {
        (values[cnt / 2 - 1] + values[cnt / 2]) / 2.0
    } else {
        values[cnt / 2]
    }
}

fn score_trend_down(events: &[ClassEventRow]) -> Vec<(String, RiskReason)> {
    let mut by_student: HashMap<&str, Vec<&ClassEventRow>> = HashMap::new();
    for event in events {
        if event.r#type == EventType::SubmissionGraded {
            by_student
                .entry(event.student_id.as_str())
                .or_default()
                .push(event);
        }
    }

    let mut flagged = Vec::new();
    for (student, mut graded) in by_student {
        graded.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let (Some(latest), Some(previous)) = (graded.first(), graded.get(1)) {
            if let (Some(latest_score), Some(previous_score)) = (latest.score, previous.score) {
                if latest_score < previous_score {
                    flagged.push((student.to_string(), RiskReason::ScoreTrendDown));
                }
            }
        }
    }
    flagged.sort_by(|a, b| a.0.cmp(&b.0));
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn row(
        r#type: EventType,
        student: &str,
        assignment: &str,
        score: Option<f64>,
        age_secs: i64,
    ) -> ClassEventRow {
        ClassEventRow {
            r#type,
            student_id: student.to_string(),
            assignment_id: assignment.to_string(),
            score,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn flags_student_with_zero_graded() {
        let events = vec![row(EventType::AssignmentAssigned, "s1", "a1", None, 10)];
        let flags = missing_submissions(&events);
        assert_eq!(flags, vec![("s1".to_string(), RiskReason::MissingSubmissions)]);
    }

    #[test]
    fn does_not_flag_student_with_any_graded() {
        let events = vec![
            row(EventType::AssignmentAssigned, "s1", "a1", None, 10),
            row(EventType::SubmissionGraded, "s1", "a1", Some(50.0), 5),
        ];
        assert!(missing_submissions(&events).is_empty());
    }

    #[test]
    fn median_even_count_averages_middle_two() {
        assert_eq!(median_of(vec![0.2, 0.4, 0.6, 0.8]), 0.5);
    }

    #[test]
    fn median_odd_count_takes_middle() {
        assert_eq!(median_of(vec![0.1, 0.5, 0.9]), 0.5);
    }

    #[test]
    fn completion_below_median_ignores_zero_denominator_students() {
        let events = vec![
            row(EventType::AssignmentAssigned, "s1", "a1", None, 10),
            row(EventType::SubmissionGraded, "s1", "a1", Some(90.0), 5),
            // s2 has no assignment events at all, must be excluded from the population.
            row(EventType::SubmissionGraded, "s2", "a9", Some(10.0), 1),
        ];
        assert!(completion_below_median(&events).is_empty());
    }

    #[test]
    fn score_trend_down_flags_decreasing_latest_score() {
        let events = vec![
            row(EventType::SubmissionGraded, "s1", "a1", Some(80.0), 20),
            row(EventType::SubmissionGraded, "s1", "a2", Some(60.0), 5),
        ];
        let flags = score_trend_down(&events);
        assert_eq!(flags, vec![("s1".to_string(), RiskReason::ScoreTrendDown)]);
    }

    #[test]
    fn score_trend_down_ignores_improving_student() {
        let events = vec![
            row(EventType::SubmissionGraded, "s1", "a1", Some(60.0), 20),
            row(EventType::SubmissionGraded, "s1", "a2", Some(80.0), 5),
        ];
        assert!(score_trend_down(&events).is_empty());
    }
}
