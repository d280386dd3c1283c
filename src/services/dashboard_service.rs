//! Read-only composition over the projection stores.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::domain::{StudentMasteryView, StudentTimeline, TeacherDashboard};
use crate::metrics::Metrics;
use crate::repos::{mastery_repo, recent_activity_repo, risk_repo, rollup_repo, timeline_repo};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub struct DashboardReader {
    pool: PgPool,
    recent_limit: i64,
    timeline_default_limit: i64,
    metrics: Arc<Metrics>,
}

impl DashboardReader {
    pub fn new(
        pool: PgPool,
        recent_limit: i64,
        timeline_default_limit: i64,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            pool,
            recent_limit,
            timeline_default_limit,
            metrics,
        }
    }

    /// Class rollup (defaulting to `completion_rate = 0` when absent),
    /// at-risk students with their reasons aggregated, and the most recent
    /// activity in the class. `teacher_id` is an opaque pass-through
    /// identifier; no authorization check is performed.
    pub async fn teacher_class_dashboard(
        &self,
        _teacher_id: &str,
        class_id: &str,
    ) -> Result<TeacherDashboard, DashboardError> {
        let timer = Metrics::timer();

        let rollup = rollup_repo::get(&self.pool, class_id).await?;
        let at_risk_students = risk_repo::get_by_class(&self.pool, class_id).await?;
        let recent_activity =
            recent_activity_repo::recent_for_class(&self.pool, class_id, self.recent_limit).await?;

        self.metrics
            .dashboard_query_latency_seconds
            .with_label_values(&["teacher_class_dashboard"])
            .observe(timer.elapsed().as_secs_f64());

        Ok(TeacherDashboard {
            class_id: class_id.to_string(),
            completion_rate: rollup.completion_rate,
            avg_score: rollup.avg_score,
            at_risk_students,
            recent_activity,
        })
    }

    /// All `(standard_id, mastery_score)` rows for a student, ordered by
    /// `standard_id`.
    pub async fn student_mastery(
        &self,
        student_id: &str,
    ) -> Result<StudentMasteryView, DashboardError> {
        let timer = Metrics::timer();
        let mastery = mastery_repo::get_by_student(&self.pool, student_id).await?;
        self.metrics
            .dashboard_query_latency_seconds
            .with_label_values(&["student_mastery"])
            .observe(timer.elapsed().as_secs_f64());

        Ok(StudentMasteryView {
            student_id: student_id.to_string(),
            mastery,
        })
    }

    /// Most recent events for a (student, class) pair, newest first.
    /// `limit` defaults to the configured timeline limit when `None`.
    pub async fn student_class_timeline(
        &self,
        student_id: &str,
        class_id: &str,
        limit: Option<i64>,
    ) -> Result<StudentTimeline, DashboardError> {
        let timer = Metrics::timer();
        let events = timeline_repo::recent_for_student_class(
            &self.pool,
            student_id,
            class_id,
            limit.unwrap_or(self.timeline_default_limit),
        )
        .await?;
        self.metrics
            .dashboard_query_latency_seconds
            .with_label_values(&["student_class_timeline"])
            .observe(timer.elapsed().as_secs_f64());

        Ok(StudentTimeline {
            student_id: student_id.to_string(),
            class_id: class_id.to_string(),
            events,
        })
    }
}
