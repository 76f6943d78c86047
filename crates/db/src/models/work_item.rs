//! Work item entity (owned by the task surface, consumed by the
//! completion propagator).

use serde::Serialize;
use sqlx::FromRow;

use profold_core::types::{DbId, Timestamp};

/// A row from the `work_items` table.
///
/// `model_ids` is an ordered, comma-joined list of sequence-record ids.
/// The propagator treats it as a set to be kept consistent with the
/// records reachable from the item's primary record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkItem {
    pub id: DbId,
    pub title: String,
    pub sequence: String,
    pub model_ids: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
