//! Outbox worker process entry point.
//!
//! Loads configuration, runs pending migrations, and spawns the worker
//! pool. An ingestion front-end and any HTTP/metrics exporter surface are
//! out of scope here and owned by another process sharing the same
//! database.

use std::sync::Arc;
use std::time::Duration;

use mastery_rs::services::processor::Processor;
use mastery_rs::services::queue_service::Queue;
use mastery_rs::worker::WorkerPool;
use mastery_rs::{db, logging, Config, Metrics};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env().expect("failed to load configuration from environment");
    logging::init(config.is_development());

    tracing::info!(env = %config.env, "starting mastery worker");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("failed to connect to database");

    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    let metrics = Arc::new(Metrics::new());
    let queue = Arc::new(Queue::new(pool.clone(), config.max_retries));
    let processor = Arc::new(Processor::new(
        pool.clone(),
        config.mastery_max_score,
        metrics.clone(),
    ));

    let cancellation = CancellationToken::new();

    let worker_pool = WorkerPool::spawn(
        config.worker_concurrency,
        queue,
        processor,
        config.claim_batch_size,
        Duration::from_millis(config.poll_interval_ms),
        cancellation.clone(),
    );

    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, draining in-flight work");
    cancellation.cancel();

    let shutdown_grace = Duration::from_secs(config.shutdown_grace_secs);
    if tokio::time::timeout(shutdown_grace, worker_pool.join())
        .await
        .is_err()
    {
        tracing::warn!("worker pool did not drain within the shutdown grace period");
    }

    tracing::info!("worker process exiting");
}
