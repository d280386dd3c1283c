//! Dispatches one claimed outbox item to its derivations.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::domain::{EventType, IncomingEvent};
use crate::metrics::Metrics;
use crate::repos::event_repo;
use crate::services::mastery_service::MasteryService;
use crate::services::risk_service::RiskService;
use crate::services::rollup_service::RollupService;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("malformed stored payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct Processor {
    pool: PgPool,
    mastery: MasteryService,
    rollup: RollupService,
    risk: RiskService,
    metrics: Arc<Metrics>,
}

impl Processor {
    pub fn new(pool: PgPool, mastery_max_score: f64, metrics: Arc<Metrics>) -> Self {
        Self {
            mastery: MasteryService::new(pool.clone(), mastery_max_score),
            rollup: RollupService::new(pool.clone()),
            risk: RiskService::new(pool.clone()),
            pool,
            metrics,
        }
    }

    /// Process one event by its event store id.
    ///
    /// A missing row is treated as success: the item was created for a
    /// now-deleted event, unreachable under normal operation but tolerated.
    /// Partial progress on an earlier derivation is left in place on
    /// failure; projections recompute from the log on the next pass.
    pub async fn process(&self, event_db_id: i64) -> Result<(), ProcessingError> {
        let timer = Metrics::timer();

        let Some(event) = event_repo::get_by_id(&self.pool, event_db_id).await? else {
            return Ok(());
        };

        let result = self.dispatch(&event.r#type, &event.payload).await;

        if result.is_err() {
            self.metrics
                .worker_failures_total
                .with_label_values(&[event.r#type.as_str()])
                .inc();
        }
        self.metrics
            .worker_processing_latency_seconds
            .with_label_values(&[event.r#type.as_str()])
            .observe(timer.elapsed().as_secs_f64());

        result
    }

    async fn dispatch(
        &self,
        event_type: &EventType,
        payload: &serde_json::Value,
    ) -> Result<(), ProcessingError> {
        let incoming: IncomingEvent = serde_json::from_value(payload.clone())?;

        if *event_type == EventType::SubmissionGraded {
            self.mastery.update_from_graded_event(&incoming).await?;
        }

        if !incoming.class_id.is_empty() {
            self.rollup.recompute(&incoming.class_id).await?;
            self.risk.recompute(&incoming.class_id).await?;
        }

        Ok(())
    }
}
