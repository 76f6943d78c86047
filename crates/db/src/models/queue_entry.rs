//! Prediction queue entities.

use serde::Serialize;
use sqlx::FromRow;

use profold_core::tool::PredictorTool;
use profold_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// The two predictor tools that have a backing queue table.
///
/// ESMFold is synchronous and never queued, so it has no `QueueKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Alphafold,
    Itasser,
}

impl QueueKind {
    pub const ALL: [QueueKind; 2] = [QueueKind::Alphafold, QueueKind::Itasser];

    /// The backing table for this queue. Both tables share one shape.
    pub fn table(self) -> &'static str {
        match self {
            QueueKind::Alphafold => "alphafold_queue",
            QueueKind::Itasser => "itasser_queue",
        }
    }

    pub fn tool(self) -> PredictorTool {
        match self {
            QueueKind::Alphafold => PredictorTool::Alphafold,
            QueueKind::Itasser => PredictorTool::Itasser,
        }
    }

    pub fn from_tool(tool: PredictorTool) -> Option<QueueKind> {
        match tool {
            PredictorTool::Alphafold => Some(QueueKind::Alphafold),
            PredictorTool::Itasser => Some(QueueKind::Itasser),
            PredictorTool::Esmfold => None,
        }
    }
}

/// A row from one of the per-tool queue tables.
///
/// `sequence` is a denormalized copy, not a reference; the job must
/// survive even if the record changes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueEntry {
    pub id: DbId,
    pub sequence: String,
    pub parent_id: Option<DbId>,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Per-status entry counts for one queue, projected by the status surface.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QueueStatusCounts {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}
