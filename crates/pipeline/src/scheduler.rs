//! Polling queue scheduler: admission control, dispatch, retirement.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use profold_db::repositories::{PredictionQueueRepo, SequenceRecordRepo};

use crate::config::PipelineConfig;
use crate::enrichment::Enrichment;
use crate::processor::JobProcessor;

/// Records picked up per tick by the enrichment retry.
const ENRICHMENT_BACKFILL_BATCH: i64 = 5;

/// Periodically claims the oldest pending entry per tool (while that
/// tool's single processing slot is free) and dispatches it as detached
/// work, then sweeps terminal entries past the retention window.
///
/// The loop blocks only on its timer and on the short admission
/// queries; it never waits for a dispatched job.
pub struct QueueScheduler {
    pool: PgPool,
    processors: Vec<Arc<JobProcessor>>,
    enrichment: Arc<Enrichment>,
    poll_interval: Duration,
    retention: chrono::Duration,
    running: Arc<AtomicBool>,
    tracker: TaskTracker,
}

impl QueueScheduler {
    pub fn new(
        pool: PgPool,
        processors: Vec<Arc<JobProcessor>>,
        enrichment: Arc<Enrichment>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            pool,
            processors,
            enrichment,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            retention: chrono::Duration::hours(config.retention_hours),
            running: Arc::new(AtomicBool::new(false)),
            tracker: TaskTracker::new(),
        }
    }

    /// Shared flag the status surface reads.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run the scheduler loop until the cancellation token is triggered,
    /// then drain in-flight jobs.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            retention_hours = self.retention.num_hours(),
            "Queue scheduler started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Queue scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        self.tracker.close();
        self.tracker.wait().await;
        tracing::info!("Queue scheduler drained");
    }

    /// One scheduling cycle: per tool, admit at most one job, then sweep.
    async fn tick(&self) {
        for processor in &self.processors {
            let kind = processor.kind();
            match PredictionQueueRepo::claim_oldest_pending(&self.pool, kind).await {
                Ok(Some(entry)) => {
                    tracing::info!(
                        entry_id = entry.id,
                        tool = %kind.tool(),
                        "Claimed queue entry",
                    );
                    let processor = Arc::clone(processor);
                    // Fire-and-forget: the loop must not wait on a run
                    // that can take hours.
                    self.tracker.spawn(async move {
                        processor.run(entry).await;
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(tool = %kind.tool(), error = %e, "Claim query failed");
                }
            }
        }

        self.sweep_terminal().await;
        self.backfill_enrichment().await;
    }

    /// Retry enrichment for records whose prediction finished but whose
    /// parameters never landed (an earlier enrichment attempt failed).
    async fn backfill_enrichment(&self) {
        let records = match SequenceRecordRepo::find_missing_parameters(
            &self.pool,
            ENRICHMENT_BACKFILL_BATCH,
        )
        .await
        {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Enrichment backfill query failed");
                return;
            }
        };

        for record in records {
            tracing::info!(record_id = record.id, "Retrying enrichment");
            self.enrichment.run_all(&self.pool, record.id).await;
        }
    }

    /// Delete terminal entries older than the retention window. Recent
    /// terminal entries are kept as a debugging window.
    async fn sweep_terminal(&self) {
        let cutoff = chrono::Utc::now() - self.retention;
        for processor in &self.processors {
            let kind = processor.kind();
            match PredictionQueueRepo::delete_terminal_older_than(&self.pool, kind, cutoff).await {
                Ok(0) => {}
                Ok(deleted) => {
                    tracing::info!(tool = %kind.tool(), deleted, "Retention sweep purged entries")
                }
                Err(e) => {
                    tracing::error!(tool = %kind.tool(), error = %e, "Retention sweep failed")
                }
            }
        }
    }
}
