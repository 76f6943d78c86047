//! Drives one claimed queue entry to a terminal state.

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use profold_core::sequence;
use profold_db::models::queue_entry::{QueueEntry, QueueKind};
use profold_db::repositories::{PredictionQueueRepo, SequenceRecordRepo};

use crate::enrichment::Enrichment;
use crate::error::PipelineError;
use crate::predictor::Predictor;
use crate::propagate;
use crate::storage::ModelStore;

/// Runs one predictor's jobs: validates the sequence, invokes the
/// external tool, stores the model, and triggers downstream effects.
///
/// Exactly one terminal transition is written per run, derived from
/// whether every step actually succeeded.
pub struct JobProcessor {
    pool: PgPool,
    predictor: Arc<dyn Predictor>,
    store: ModelStore,
    enrichment: Arc<Enrichment>,
}

impl JobProcessor {
    pub fn new(
        pool: PgPool,
        predictor: Arc<dyn Predictor>,
        store: ModelStore,
        enrichment: Arc<Enrichment>,
    ) -> Self {
        Self {
            pool,
            predictor,
            store,
            enrichment,
        }
    }

    pub fn kind(&self) -> QueueKind {
        self.predictor.kind()
    }

    /// Run a claimed entry to completion and write its terminal status.
    ///
    /// Never returns an error: every failure mode ends in a `failed`
    /// transition plus a log line, so a dispatched job can never strand
    /// an entry in `processing` or crash the scheduler.
    pub async fn run(&self, entry: QueueEntry) {
        let kind = self.kind();
        let tool = kind.tool();
        tracing::info!(
            entry_id = entry.id,
            %tool,
            sequence_len = entry.sequence.len(),
            "Prediction job started",
        );

        match self.run_inner(&entry).await {
            Ok(record_id) => {
                match PredictionQueueRepo::mark_completed(&self.pool, kind, entry.id).await {
                    Ok(true) => {
                        tracing::info!(entry_id = entry.id, %tool, record_id, "Prediction job completed")
                    }
                    Ok(false) => {
                        tracing::warn!(entry_id = entry.id, %tool, "Entry left processing before completion mark")
                    }
                    Err(e) => {
                        tracing::error!(entry_id = entry.id, %tool, error = %e, "Failed to mark entry completed")
                    }
                }
            }
            Err(e) => {
                tracing::error!(entry_id = entry.id, %tool, error = %e, "Prediction job failed");
                match PredictionQueueRepo::mark_failed(&self.pool, kind, entry.id).await {
                    Ok(_) => {}
                    Err(mark_err) => {
                        tracing::error!(entry_id = entry.id, %tool, error = %mark_err, "Failed to mark entry failed")
                    }
                }
            }
        }
    }

    async fn run_inner(&self, entry: &QueueEntry) -> Result<i64, PipelineError> {
        // Format precondition: reject before touching the external tool.
        if !sequence::is_amino_sequence(&entry.sequence) {
            return Err(PipelineError::InvalidSequence);
        }

        let started = Instant::now();

        // Clean scratch dir; stale files from a previous run must never
        // leak into this job's input or output.
        let work_dir = self.predictor.work_dir();
        if tokio::fs::try_exists(work_dir).await? {
            tokio::fs::remove_dir_all(work_dir).await?;
        }
        tokio::fs::create_dir_all(work_dir).await?;

        let input_path = work_dir.join(self.predictor.input_file());
        let fasta = sequence::to_fasta(self.predictor.fasta_header(), &entry.sequence);
        tokio::fs::write(&input_path, fasta).await?;

        let output = self.predictor.command().output().await?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(PipelineError::ToolFailed {
                tool: match self.kind() {
                    QueueKind::Alphafold => "alphafold",
                    QueueKind::Itasser => "itasser",
                },
                exit_code: output.status.code(),
                output: combined,
            });
        }

        let duration_secs = started.elapsed().as_secs_f64();

        // The registry created the record before this entry was
        // enrolled; storage and downstream effects key off its identity.
        let record =
            SequenceRecordRepo::find_by_scope(&self.pool, &entry.sequence, entry.parent_id)
                .await?
                .ok_or(PipelineError::RecordMissing(entry.id))?;

        let model_path = self
            .store
            .adopt(&self.predictor.output_model(), record.id)
            .await?;
        SequenceRecordRepo::set_duration(&self.pool, record.id, duration_secs).await?;
        tracing::info!(
            record_id = record.id,
            duration_secs,
            model = %model_path.display(),
            "Model stored",
        );

        // Enrichment is best-effort: the prediction itself succeeded, so
        // a lookup or scoring failure must not fail the job.
        self.enrichment.run_all(&self.pool, record.id).await;

        propagate::propagate_completion(&self.pool, record.id).await?;

        Ok(record.id)
    }
}
