//! Handlers for the read-only queue status surface.

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use profold_db::models::queue_entry::{QueueKind, QueueStatusCounts};
use profold_db::repositories::PredictionQueueRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for GET /queue/status.
#[derive(Debug, Serialize)]
pub struct QueueStatusResponse {
    /// Whether the scheduler loop is alive.
    pub scheduler_running: bool,
    pub alphafold: QueueStatusCounts,
    pub itasser: QueueStatusCounts,
}

/// GET /api/v1/queue/status
///
/// Per-tool entry counts for each queue state plus the scheduler flag.
pub async fn get_queue_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let alphafold = PredictionQueueRepo::status_counts(&state.pool, QueueKind::Alphafold).await?;
    let itasser = PredictionQueueRepo::status_counts(&state.pool, QueueKind::Itasser).await?;

    let resp = QueueStatusResponse {
        scheduler_running: state.scheduler_running.load(Ordering::SeqCst),
        alphafold,
        itasser,
    };

    Ok(Json(DataResponse { data: resp }))
}
