//! Outbox worker pool: N cooperatively-cancellable loops claiming and
//! processing batches.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::services::processor::Processor;
use crate::services::queue_service::Queue;

pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `concurrency` worker loops, each independently polling `queue`
    /// for batches of `claim_batch_size` and dispatching them to `processor`.
    /// Every loop observes `cancellation` cooperatively: it exits at the top
    /// of its next iteration once cancelled, after draining any batch
    /// already claimed.
    pub fn spawn(
        concurrency: usize,
        queue: Arc<Queue>,
        processor: Arc<Processor>,
        claim_batch_size: i64,
        poll_interval: Duration,
        cancellation: CancellationToken,
    ) -> Self {
        let handles = (0..concurrency)
            .map(|worker_id| {
                let queue = queue.clone();
                let processor = processor.clone();
                let cancellation = cancellation.clone();
                tokio::spawn(run_worker(
                    worker_id,
                    queue,
                    processor,
                    claim_batch_size,
                    poll_interval,
                    cancellation,
                ))
            })
            .collect();

        Self { handles }
    }

    /// Wait for every worker loop to exit (i.e. after cancellation and
    /// in-flight drain).
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "worker task panicked");
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    queue: Arc<Queue>,
    processor: Arc<Processor>,
    claim_batch_size: i64,
    poll_interval: Duration,
    cancellation: CancellationToken,
) {
    tracing::info!(worker_id, "worker started");

    loop {
        if cancellation.is_cancelled() {
            break;
        }

        let items = match queue.claim(claim_batch_size).await {
            Ok(items) => items,
            Err(err) => {
                tracing::error!(worker_id, error = %err, "claim failed");
                tokio::time::sleep(poll_interval).await;
                continue;
            }
        };

        if items.is_empty() {
            tokio::time::sleep(poll_interval).await;
            continue;
        }

        for item in items {
            process_one(worker_id, &queue, &processor, item).await;
        }
    }

    tracing::info!(worker_id, "worker stopped");
}

async fn process_one(
    worker_id: usize,
    queue: &Queue,
    processor: &Processor,
    item: crate::domain::OutboxItem,
) {
    match processor.process(item.event_db_id).await {
        Ok(()) => {
            if let Err(err) = queue.mark_processed(item.id).await {
                tracing::error!(worker_id, outbox_id = item.id, error = %err, "mark_processed failed");
            }
        }
        Err(err) => {
            tracing::warn!(worker_id, outbox_id = item.id, error = %err, "processing failed");
            if let Err(mark_err) = queue.mark_failed(&item, &err.to_string()).await {
                tracing::error!(worker_id, outbox_id = item.id, error = %mark_err, "mark_failed failed");
            }
        }
    }
}
