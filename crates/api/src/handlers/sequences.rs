//! Handlers for sequence submission.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use profold_core::domains::AnnotatedSubsequence;
use profold_core::sequence;
use profold_core::tool::PredictorTool;
use profold_db::models::sequence_record::SequenceRecord;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for POST /sequences.
#[derive(Debug, Deserialize)]
pub struct SubmitSequenceRequest {
    pub sequence: String,
    pub tool: PredictorTool,
    /// Run the conserved-domain decomposition and register each domain
    /// subsequence under the parent record.
    #[serde(default)]
    pub decompose: bool,
}

/// Response for POST /sequences.
#[derive(Debug, Serialize)]
pub struct SubmitSequenceResponse {
    pub record: SequenceRecord,
    /// Whether this submission created the record (false on dedup hit).
    pub created: bool,
    /// Domain subsequence records, in report order. Empty unless
    /// decomposition was requested.
    pub subsequences: Vec<SequenceRecord>,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/v1/sequences
///
/// Validates the sequence, optionally decomposes it into domain
/// subsequences, and registers everything with the requested tool.
pub async fn submit_sequence(
    State(state): State<AppState>,
    Json(input): Json<SubmitSequenceRequest>,
) -> AppResult<impl IntoResponse> {
    let seq = sequence::normalize(input.sequence.trim());
    sequence::validate_sequence(&seq)?;

    // Decompose before registering so a failed domain search leaves no
    // partial state behind.
    let annotated = if input.decompose {
        state.decomposer.decompose(&seq).await?
    } else {
        Vec::new()
    };

    let parent = state.registry.submit(&seq, None, None, input.tool).await?;
    tracing::info!(
        record_id = parent.record.id,
        created = parent.created,
        tool = %input.tool,
        subsequences = annotated.len(),
        "Sequence submitted",
    );

    let mut subsequences = Vec::with_capacity(annotated.len());
    for sub in &annotated {
        let info = domain_info(sub);
        let child = state
            .registry
            .submit(&sub.subsequence, Some(parent.record.id), Some(&info), input.tool)
            .await?;
        subsequences.push(child.record);
    }

    let status = if parent.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let resp = SubmitSequenceResponse {
        record: parent.record,
        created: parent.created,
        subsequences,
    };
    Ok((status, Json(DataResponse { data: resp })))
}

/// Serialize a domain hit into the record's annotation column.
fn domain_info(sub: &AnnotatedSubsequence) -> String {
    format!(
        "{} {} {}-{}",
        sub.hit.accession, sub.hit.short_name, sub.hit.from, sub.hit.to
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use profold_core::domains::DomainHit;

    #[test]
    fn domain_info_is_accession_name_and_range() {
        let sub = AnnotatedSubsequence {
            subsequence: "MKT".to_string(),
            hit: DomainHit {
                from: 4,
                to: 6,
                accession: "cd00159".to_string(),
                short_name: "RHOD".to_string(),
            },
        };
        assert_eq!(domain_info(&sub), "cd00159 RHOD 4-6");
    }
}
