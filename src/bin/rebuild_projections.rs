//! Rebuild projections tool
//!
//! This admin-only tool deterministically recomputes every derived
//! projection (mastery, class rollups, risk flags) from the event log. It
//! provides recovery capability when a projection store is suspected
//! corrupted or out of sync, by treating the event log as the source of
//! truth and replaying it in full.
//!
//! # Usage
//! ```bash
//! docker compose run --rm mastery-rs ./rebuild_projections
//! ```
//!
//! Takes no arguments: a full rebuild is the only mode, since the
//! derivations are recompute-from-log by design and there is no natural
//! partition to scope a partial rebuild to.

use std::sync::Arc;

use mastery_rs::domain::{EventType, IncomingEvent};
use mastery_rs::repos::class_events_repo;
use mastery_rs::services::mastery_service::MasteryService;
use mastery_rs::services::risk_service::RiskService;
use mastery_rs::services::rollup_service::RollupService;
use mastery_rs::{db, logging, repos::event_repo, Config};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("failed to load configuration from environment");
    logging::init(config.is_development());

    tracing::info!("starting full projection rebuild");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    let mastery = MasteryService::new(pool.clone(), config.mastery_max_score);
    let rollup = RollupService::new(pool.clone());
    let risk = Arc::new(RiskService::new(pool.clone()));

    rebuild_mastery(&pool, &mastery).await;
    rebuild_class_projections(&pool, &rollup, &risk).await;

    tracing::info!("projection rebuild complete");
}

/// Mastery is latest-writer-wins per (student, standard); replaying every
/// graded event in commit order reproduces the same end state a live
/// worker pool would have converged to.
async fn rebuild_mastery(pool: &sqlx::PgPool, mastery: &MasteryService) {
    let graded = event_repo::list_by_type_ordered(pool, EventType::SubmissionGraded)
        .await
        .expect("failed to load graded events");

    tracing::info!(count = graded.len(), "replaying graded events for mastery");

    for event in graded {
        let incoming: IncomingEvent = match serde_json::from_value(event.payload) {
            Ok(v) => v,
            Err(err) => {
                tracing::error!(event_id = event.id, error = %err, "skipping malformed event payload");
                continue;
            }
        };

        if let Err(err) = mastery.update_from_graded_event(&incoming).await {
            tracing::error!(event_id = event.id, error = %err, "mastery upsert failed");
        }
    }
}

/// Rollups and risk flags are recompute-from-log per class; rebuild every
/// class that has ever appeared in the event log.
async fn rebuild_class_projections(pool: &sqlx::PgPool, rollup: &RollupService, risk: &RiskService) {
    let class_ids = class_events_repo::distinct_class_ids(pool)
        .await
        .expect("failed to enumerate class ids");

    tracing::info!(count = class_ids.len(), "recomputing class projections");

    for class_id in class_ids {
        if let Err(err) = rollup.recompute(&class_id).await {
            tracing::error!(class_id = %class_id, error = %err, "rollup recompute failed");
            continue;
        }
        if let Err(err) = risk.recompute(&class_id).await {
            tracing::error!(class_id = %class_id, error = %err, "risk recompute failed");
        }
    }
}
