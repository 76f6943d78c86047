//! Repository for the per-tool prediction queue tables.
//!
//! The `status` column is the sole concurrency-control token. Every
//! transition is a single conditional UPDATE guarded by the expected
//! prior status; the partial unique index over processing rows backs the
//! single-slot invariant at the database level, so a lost claim race
//! surfaces as a unique violation rather than a second admitted job.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use profold_core::types::DbId;

use crate::models::queue_entry::{QueueEntry, QueueKind, QueueStatusCounts};
use crate::models::status::QueueStatus;

/// Column list for queue queries (both tables share one shape).
const COLUMNS: &str = "id, sequence, parent_id, status, created_at, updated_at";

pub struct PredictionQueueRepo;

impl PredictionQueueRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        kind: QueueKind,
        id: DbId,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", kind.table());
        sqlx::query_as::<_, QueueEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Enroll a sequence for prediction.
    ///
    /// No-op when an entry for the same (sequence, parent) scope is
    /// already pending, processing, or completed. A lingering `failed`
    /// row does not block re-enrollment. Returns the new entry, or
    /// `None` on no-op.
    pub async fn enroll(
        pool: &PgPool,
        kind: QueueKind,
        sequence: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        let table = kind.table();
        let query = format!(
            "INSERT INTO {table} (sequence, parent_id, status) \
             SELECT $1, $2, $3 \
             WHERE NOT EXISTS ( \
                 SELECT 1 FROM {table} \
                 WHERE sequence = $1 \
                   AND parent_id IS NOT DISTINCT FROM $2 \
                   AND status IN ($3, $4, $5) \
             ) \
             ON CONFLICT DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueEntry>(&query)
            .bind(sequence)
            .bind(parent_id)
            .bind(QueueStatus::Pending.id())
            .bind(QueueStatus::Processing.id())
            .bind(QueueStatus::Completed.id())
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim the oldest pending entry, respecting the
    /// single-slot admission policy.
    ///
    /// One conditional UPDATE: the oldest pending row is selected with
    /// `FOR UPDATE SKIP LOCKED` and flipped to processing only while no
    /// other row is processing. A concurrent claimer that slips past the
    /// `NOT EXISTS` check trips the single-slot unique index instead,
    /// which is reported here as "slot busy" (`None`).
    pub async fn claim_oldest_pending(
        pool: &PgPool,
        kind: QueueKind,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        let table = kind.table();
        let query = format!(
            "UPDATE {table} \
             SET status = $1, updated_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM {table} \
                 WHERE status = $2 \
                 ORDER BY created_at ASC, id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             AND status = $2 \
             AND NOT EXISTS (SELECT 1 FROM {table} WHERE status = $1) \
             RETURNING {COLUMNS}"
        );
        let claimed = sqlx::query_as::<_, QueueEntry>(&query)
            .bind(QueueStatus::Processing.id())
            .bind(QueueStatus::Pending.id())
            .fetch_optional(pool)
            .await;

        match claimed {
            Ok(entry) => Ok(entry),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Transition a processing entry to completed. Returns `false` when
    /// the entry was not in processing (terminal states are never
    /// revisited).
    pub async fn mark_completed(
        pool: &PgPool,
        kind: QueueKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        Self::finish(pool, kind, id, QueueStatus::Completed).await
    }

    /// Transition a processing entry to failed. Same guard as
    /// [`Self::mark_completed`].
    pub async fn mark_failed(
        pool: &PgPool,
        kind: QueueKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        Self::finish(pool, kind, id, QueueStatus::Failed).await
    }

    async fn finish(
        pool: &PgPool,
        kind: QueueKind,
        id: DbId,
        terminal: QueueStatus,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status = $3",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(terminal.id())
            .bind(QueueStatus::Processing.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Entry counts per status, for the read-only status surface.
    pub async fn status_counts(
        pool: &PgPool,
        kind: QueueKind,
    ) -> Result<QueueStatusCounts, sqlx::Error> {
        let query = format!(
            "SELECT status, COUNT(*) FROM {} GROUP BY status",
            kind.table()
        );
        let rows: Vec<(i16, i64)> = sqlx::query_as(&query).fetch_all(pool).await?;

        let mut counts = QueueStatusCounts::default();
        for (status, count) in rows {
            match QueueStatus::from_id(status) {
                Some(QueueStatus::Pending) => counts.pending = count,
                Some(QueueStatus::Processing) => counts.processing = count,
                Some(QueueStatus::Completed) => counts.completed = count,
                Some(QueueStatus::Failed) => counts.failed = count,
                None => tracing::warn!(status, table = kind.table(), "Unknown queue status"),
            }
        }
        Ok(counts)
    }

    /// Delete terminal entries whose last update is older than `cutoff`.
    /// Returns the number of rows removed.
    pub async fn delete_terminal_older_than(
        pool: &PgPool,
        kind: QueueKind,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE status IN ($1, $2) AND updated_at < $3",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(QueueStatus::Completed.id())
            .bind(QueueStatus::Failed.id())
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
