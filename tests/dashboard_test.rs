//! Dashboard reader composition. Requires `DATABASE_URL`; run with
//! `--ignored`.

mod common;

use std::sync::Arc;

use chrono::Utc;
use mastery_rs::domain::IncomingEvent;
use mastery_rs::services::dashboard_service::DashboardReader;
use mastery_rs::services::ingestion_service::IngestionService;
use mastery_rs::services::processor::Processor;
use mastery_rs::Metrics;
use uuid::Uuid;

#[tokio::test]
#[ignore]
async fn teacher_class_dashboard_defaults_completion_rate_to_zero_when_absent() {
    let pool = common::get_test_pool().await;
    let dashboard = DashboardReader::new(pool.clone(), 20, 50, Arc::new(Metrics::new()));

    let class_id = format!("dash-empty-{}", Uuid::new_v4());
    let result = dashboard
        .teacher_class_dashboard("teacher1", &class_id)
        .await
        .expect("dashboard read");

    assert_eq!(result.completion_rate, 0.0);
    assert!(result.avg_score.is_none());
    assert!(result.at_risk_students.is_empty());
}

#[tokio::test]
#[ignore]
async fn student_class_timeline_returns_most_recent_events_first() {
    let pool = common::get_test_pool().await;
    let ingestion = IngestionService::new(pool.clone(), Arc::new(Metrics::new()));
    let processor = Processor::new(pool.clone(), 100.0, Arc::new(Metrics::new()));
    let dashboard = DashboardReader::new(pool.clone(), 20, 50, Arc::new(Metrics::new()));

    let class_id = format!("dash-timeline-{}", Uuid::new_v4());
    let student = format!("st-{}", Uuid::new_v4());

    let assigned = IncomingEvent {
        event_id: Uuid::new_v4().to_string(),
        source: "dashboard-test".to_string(),
        timestamp: Utc::now(),
        student_id: student.clone(),
        class_id: class_id.clone(),
        assignment_id: "a1".to_string(),
        standard_ids: vec!["std1".to_string()],
        score: None,
        rubric_tags: None,
        r#type: Some("ASSIGNMENT_ASSIGNED".to_string()),
    };
    let outcome = ingestion.ingest(&assigned).await.expect("ingest assigned");
    processor.process(outcome.event_db_id).await.expect("process assigned");

    let mut graded = assigned.clone();
    graded.event_id = Uuid::new_v4().to_string();
    graded.score = Some(88.0);
    graded.r#type = None;
    graded.timestamp = Utc::now();
    let outcome = ingestion.ingest(&graded).await.expect("ingest graded");
    processor.process(outcome.event_db_id).await.expect("process graded");

    let timeline = dashboard
        .student_class_timeline(&student, &class_id, None)
        .await
        .expect("timeline read");

    assert_eq!(timeline.events.len(), 2);
    assert_eq!(timeline.events[0].event_type, "SUBMISSION_GRADED");

    common::cleanup_class(&pool, &class_id).await;
    common::cleanup_student(&pool, &student).await;
}
