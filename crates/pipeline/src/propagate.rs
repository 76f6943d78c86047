//! Completion propagation into dependent work items.

use sqlx::PgPool;

use profold_core::types::DbId;
use profold_db::repositories::{SequenceRecordRepo, WorkItemRepo};

/// Update every work item that references the completed record's root.
///
/// The stored model-id list is recomputed from the current cluster
/// (root record plus all its children, in id order) and written only
/// when it differs, so re-running on an already-consistent item is a
/// no-op.
pub async fn propagate_completion(pool: &PgPool, record_id: DbId) -> Result<(), sqlx::Error> {
    let Some(record) = SequenceRecordRepo::find_by_id(pool, record_id).await? else {
        tracing::warn!(record_id, "Propagation skipped: record vanished");
        return Ok(());
    };

    let root_id = record.root_id();
    let items = WorkItemRepo::find_referencing(pool, root_id).await?;
    if items.is_empty() {
        return Ok(());
    }

    let cluster = SequenceRecordRepo::cluster_ids(pool, root_id).await?;
    let rebuilt = join_ids(&cluster);

    for item in items {
        if item.model_ids != rebuilt {
            WorkItemRepo::update_model_ids(pool, item.id, &rebuilt).await?;
            tracing::info!(
                work_item_id = item.id,
                root_id,
                model_ids = %rebuilt,
                "Work item model list updated",
            );
        }
    }
    Ok(())
}

/// Render an ordered id list as the comma-joined wire format work items
/// store.
pub fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_in_order_without_separator_noise() {
        assert_eq!(join_ids(&[7]), "7");
        assert_eq!(join_ids(&[3, 11, 12]), "3,11,12");
        assert_eq!(join_ids(&[]), "");
    }
}
