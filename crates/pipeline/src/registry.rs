//! Deduplicating sequence registry: the single entry point that turns a
//! submitted sequence into a record plus (for queued tools) a queue
//! enrollment or (for ESMFold) an immediate fold.

use std::sync::Arc;

use sqlx::PgPool;

use profold_core::tool::PredictorTool;
use profold_core::types::DbId;
use profold_db::models::queue_entry::QueueKind;
use profold_db::models::sequence_record::SequenceRecord;
use profold_db::repositories::{PredictionQueueRepo, SequenceRecordRepo};

use crate::enrichment::Enrichment;
use crate::error::PipelineError;
use crate::esmfold::EsmFoldClient;
use crate::storage::ModelStore;

/// Outcome of a submission: the record it resolved to and whether this
/// submission created it.
#[derive(Debug)]
pub struct Submission {
    pub record: SequenceRecord,
    pub created: bool,
    /// Set when the submission enrolled a fresh queue entry.
    pub queue_entry_id: Option<DbId>,
}

pub struct SequenceRegistry {
    pool: PgPool,
    esmfold: EsmFoldClient,
    store: ModelStore,
    enrichment: Arc<Enrichment>,
}

impl SequenceRegistry {
    pub fn new(
        pool: PgPool,
        esmfold: EsmFoldClient,
        store: ModelStore,
        enrichment: Arc<Enrichment>,
    ) -> Self {
        Self {
            pool,
            esmfold,
            store,
            enrichment,
        }
    }

    /// Resolve a (sequence, parent) scope to exactly one record and kick
    /// off prediction with the requested tool.
    ///
    /// The record insert races against concurrent submissions of the
    /// same scope; the loser of that race re-selects the winner's row,
    /// so both callers observe the same record. Queued tools then go
    /// through `enroll`, which is itself a no-op while an active entry
    /// for the scope exists. ESMFold runs as a detached task and only
    /// for the submission that created the record.
    pub async fn submit(
        &self,
        sequence: &str,
        parent_id: Option<DbId>,
        domain_info: Option<&str>,
        tool: PredictorTool,
    ) -> Result<Submission, PipelineError> {
        let (record, created) = self.find_or_create(sequence, parent_id, domain_info).await?;

        let mut queue_entry_id = None;
        match QueueKind::from_tool(tool) {
            Some(kind) => {
                match PredictionQueueRepo::enroll(&self.pool, kind, sequence, parent_id).await? {
                    Some(entry) => {
                        tracing::info!(
                            record_id = record.id,
                            entry_id = entry.id,
                            %tool,
                            "Sequence enrolled for prediction",
                        );
                        queue_entry_id = Some(entry.id);
                    }
                    None => {
                        tracing::debug!(
                            record_id = record.id,
                            %tool,
                            "Enrollment skipped: active or completed entry exists",
                        );
                    }
                }
            }
            None if created => self.spawn_fast_path(&record),
            None => {
                tracing::debug!(record_id = record.id, "Fast path skipped: record already known")
            }
        }

        Ok(Submission {
            record,
            created,
            queue_entry_id,
        })
    }

    async fn find_or_create(
        &self,
        sequence: &str,
        parent_id: Option<DbId>,
        domain_info: Option<&str>,
    ) -> Result<(SequenceRecord, bool), PipelineError> {
        if let Some(existing) =
            SequenceRecordRepo::find_by_scope(&self.pool, sequence, parent_id).await?
        {
            return Ok((existing, false));
        }

        match SequenceRecordRepo::create(&self.pool, sequence, parent_id, domain_info).await {
            Ok(record) => Ok((record, true)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                // Lost the insert race; the winner's row is authoritative.
                let record = SequenceRecordRepo::find_by_scope(&self.pool, sequence, parent_id)
                    .await?
                    .ok_or(PipelineError::RecordMissing(0))?;
                Ok((record, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// ESMFold fast path: fold over HTTP in a detached task, store the
    /// model, then enrich. Failures only log; the record stays without a
    /// model and can be resubmitted with a queued tool.
    fn spawn_fast_path(&self, record: &SequenceRecord) {
        let pool = self.pool.clone();
        let esmfold = self.esmfold.clone();
        let store = self.store.clone();
        let enrichment = Arc::clone(&self.enrichment);
        let record_id = record.id;
        let sequence = record.sequence.clone();

        tokio::spawn(async move {
            let started = std::time::Instant::now();
            let pdb = match esmfold.predict(&sequence).await {
                Ok(pdb) => pdb,
                Err(e) => {
                    tracing::error!(record_id, error = %e, "ESMFold prediction failed");
                    return;
                }
            };
            if let Err(e) = store.write(record_id, &pdb).await {
                tracing::error!(record_id, error = %e, "ESMFold model write failed");
                return;
            }
            let duration_secs = started.elapsed().as_secs_f64();
            if let Err(e) =
                SequenceRecordRepo::set_duration(&pool, record_id, duration_secs).await
            {
                tracing::error!(record_id, error = %e, "ESMFold duration update failed");
            }
            tracing::info!(record_id, duration_secs, "ESMFold model stored");

            enrichment.run_all(&pool, record_id).await;
            if let Err(e) = crate::propagate::propagate_completion(&pool, record_id).await {
                tracing::error!(record_id, error = %e, "Completion propagation failed");
            }
        });
    }
}
