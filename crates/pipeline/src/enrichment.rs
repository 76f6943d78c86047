//! Post-prediction enrichment: biochemical parameters, structure-file
//! scores, and the external structure-count lookup.
//!
//! Everything here is best-effort. The prediction already succeeded
//! when enrichment runs, so failures are logged and left for a later
//! re-run instead of failing the job.

use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tokio::process::Command;

use profold_core::params;
use profold_core::types::DbId;
use profold_db::models::sequence_record::SequenceRecord;
use profold_db::repositories::SequenceRecordRepo;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::storage::ModelStore;

/// E-value cutoff for the archive sequence search.
const RCSB_EVALUE_CUTOFF: f64 = 0.1;

pub struct Enrichment {
    http: reqwest::Client,
    rcsb_endpoint: String,
    store: ModelStore,
    sa_script: Option<std::path::PathBuf>,
    rc_script: Option<std::path::PathBuf>,
}

/// Count-only response from the archive search endpoint.
#[derive(Debug, Deserialize)]
struct RcsbCountResponse {
    #[serde(default)]
    total_count: i32,
}

impl Enrichment {
    pub fn new(config: &PipelineConfig, store: ModelStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            rcsb_endpoint: config.rcsb_endpoint.clone(),
            store,
            sa_script: config.solvent_accessibility_script.clone(),
            rc_script: config.rc_score_script.clone(),
        }
    }

    /// Run every enrichment step for a record, logging failures.
    pub async fn run_all(&self, pool: &PgPool, record_id: DbId) {
        let record = match SequenceRecordRepo::find_by_id(pool, record_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!(record_id, "Enrichment skipped: record vanished");
                return;
            }
            Err(e) => {
                tracing::warn!(record_id, error = %e, "Enrichment skipped: record load failed");
                return;
            }
        };

        if let Err(e) = self.apply_parameters(pool, &record).await {
            tracing::warn!(record_id, error = %e, "Parameter calculation failed");
        }
        if let Err(e) = self.apply_structure_scores(pool, &record).await {
            tracing::warn!(record_id, error = %e, "Structure scoring failed");
        }
        if let Err(e) = self.apply_structure_count(pool, &record).await {
            tracing::warn!(record_id, error = %e, "Structure-count lookup failed");
        }
    }

    /// Sequence-derived parameters (pure computation).
    async fn apply_parameters(
        &self,
        pool: &PgPool,
        record: &SequenceRecord,
    ) -> Result<(), PipelineError> {
        let computed = params::compute_parameters(&record.sequence);
        SequenceRecordRepo::update_parameters(pool, record.id, &computed).await?;
        Ok(())
    }

    /// Structure-derived scores via the configured scoring scripts.
    /// Unconfigured scripts are skipped silently.
    async fn apply_structure_scores(
        &self,
        pool: &PgPool,
        record: &SequenceRecord,
    ) -> Result<(), PipelineError> {
        if self.sa_script.is_none() && self.rc_script.is_none() {
            return Ok(());
        }
        let model_path = self.store.model_path(record.id);

        let mut sa = None;
        if let Some(script) = &self.sa_script {
            sa = Some(run_score_script(script, &model_path).await?);
        }
        let mut rc = None;
        if let Some(script) = &self.rc_script {
            rc = Some(run_score_script(script, &model_path).await?);
        }

        SequenceRecordRepo::update_structure_scores(pool, record.id, sa, rc).await?;
        Ok(())
    }

    /// Count of known structures for this sequence in the public
    /// archive, cached on the record so the external call happens once.
    async fn apply_structure_count(
        &self,
        pool: &PgPool,
        record: &SequenceRecord,
    ) -> Result<(), PipelineError> {
        if record.structure_num > 0 {
            return Ok(());
        }

        let query = structure_count_query(&record.sequence);
        let response = self
            .http
            .get(&self.rcsb_endpoint)
            .query(&[("json", query.to_string())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PipelineError::UpstreamStatus(response.status().as_u16()));
        }

        let counts: RcsbCountResponse = response.json().await?;
        SequenceRecordRepo::set_structure_num(pool, record.id, counts.total_count).await?;
        tracing::debug!(
            record_id = record.id,
            structure_num = counts.total_count,
            "Structure count cached",
        );
        Ok(())
    }
}

/// Build the count-only sequence search query for the archive endpoint.
fn structure_count_query(sequence: &str) -> serde_json::Value {
    json!({
        "query": {
            "type": "terminal",
            "service": "sequence",
            "parameters": {
                "evalue_cutoff": RCSB_EVALUE_CUTOFF,
                "identity_cutoff": 0,
                "target": "pdb_protein_sequence",
                "value": sequence,
            }
        },
        "return_type": "entry",
        "request_options": { "return_counts": true }
    })
}

/// Run a scoring script that prints a single float on stdout.
async fn run_score_script(
    script: &std::path::Path,
    model_path: &std::path::Path,
) -> Result<f64, PipelineError> {
    let output = Command::new(script).arg(model_path).output().await?;
    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: "score-script",
            exit_code: output.status.code(),
            output: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<f64>().ok())
        .ok_or_else(|| PipelineError::ToolFailed {
            tool: "score-script",
            exit_code: output.status.code(),
            output: format!("unparseable score output: {stdout}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_query_asks_for_counts_only() {
        let query = structure_count_query("MKT");
        assert_eq!(query["request_options"]["return_counts"], true);
        assert_eq!(query["return_type"], "entry");
        assert_eq!(query["query"]["parameters"]["value"], "MKT");
        assert_eq!(query["query"]["service"], "sequence");
    }
}
