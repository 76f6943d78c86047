//! Repository for the `work_items` table.
//!
//! The pipeline does not own work items; it only finds the ones that
//! reference a completed record and rewrites their model-id list.

use sqlx::PgPool;

use profold_core::types::DbId;

use crate::models::work_item::WorkItem;

/// Column list for `work_items` queries.
const COLUMNS: &str = "id, title, sequence, model_ids, created_at, updated_at";

pub struct WorkItemRepo;

impl WorkItemRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_items WHERE id = $1");
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a work item referencing an initial record-id list. The
    /// task surface owns creation; this exists for it and for tests.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        sequence: &str,
        model_ids: &str,
    ) -> Result<WorkItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_items (title, sequence, model_ids) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(title)
            .bind(sequence)
            .bind(model_ids)
            .fetch_one(pool)
            .await
    }

    /// Find every work item whose comma-joined `model_ids` list contains
    /// `record_id` as an exact element.
    ///
    /// Element-exact matching needs four patterns (sole element, first,
    /// middle, last) so that id 12 never matches a list containing 112.
    pub async fn find_referencing(
        pool: &PgPool,
        record_id: DbId,
    ) -> Result<Vec<WorkItem>, sqlx::Error> {
        let id = record_id.to_string();
        let query = format!(
            "SELECT {COLUMNS} FROM work_items \
             WHERE model_ids = $1 \
                OR model_ids LIKE $2 \
                OR model_ids LIKE $3 \
                OR model_ids LIKE $4 \
             ORDER BY id"
        );
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(&id)
            .bind(format!("{id},%"))
            .bind(format!("%,{id},%"))
            .bind(format!("%,{id}"))
            .fetch_all(pool)
            .await
    }

    /// Overwrite the model-id list. Callers compare against the stored
    /// list first so propagation stays idempotent.
    pub async fn update_model_ids(
        pool: &PgPool,
        id: DbId,
        model_ids: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE work_items SET model_ids = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(model_ids)
            .execute(pool)
            .await?;
        Ok(())
    }
}
