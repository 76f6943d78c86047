//! Repository for the `sequence_records` table.

use sqlx::PgPool;

use profold_core::params::SequenceParams;
use profold_core::types::DbId;

use crate::models::sequence_record::SequenceRecord;

/// Column list for `sequence_records` queries.
const COLUMNS: &str = "\
    id, sequence, parent_id, domain_info, \
    hydrophobicity, instability, isoelectric_point, molecular_weight, \
    solvent_accessibility, rc_score, structure_num, duration_secs, \
    created_at, updated_at";

pub struct SequenceRecordRepo;

impl SequenceRecordRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SequenceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequence_records WHERE id = $1");
        sqlx::query_as::<_, SequenceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a record by its dedup scope: the (sequence, parent) pair.
    pub async fn find_by_scope(
        pool: &PgPool,
        sequence: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<SequenceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequence_records \
             WHERE sequence = $1 AND parent_id IS NOT DISTINCT FROM $2"
        );
        sqlx::query_as::<_, SequenceRecord>(&query)
            .bind(sequence)
            .bind(parent_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new record. Fails with a unique violation if the
    /// (sequence, parent) scope already exists; callers re-select in
    /// that case.
    pub async fn create(
        pool: &PgPool,
        sequence: &str,
        parent_id: Option<DbId>,
        domain_info: Option<&str>,
    ) -> Result<SequenceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO sequence_records (sequence, parent_id, domain_info) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SequenceRecord>(&query)
            .bind(sequence)
            .bind(parent_id)
            .bind(domain_info)
            .fetch_one(pool)
            .await
    }

    /// Store the wall-clock duration of a finished prediction run.
    pub async fn set_duration(
        pool: &PgPool,
        id: DbId,
        duration_secs: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sequence_records SET duration_secs = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(duration_secs)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the sequence-derived biochemical parameters.
    pub async fn update_parameters(
        pool: &PgPool,
        id: DbId,
        params: &SequenceParams,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sequence_records \
             SET molecular_weight = $2, hydrophobicity = $3, instability = $4, \
                 isoelectric_point = $5, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(params.molecular_weight)
        .bind(params.hydrophobicity)
        .bind(params.instability)
        .bind(params.isoelectric_point)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the structure-derived scores. `None` leaves a score untouched
    /// so a partial scoring run does not erase an earlier result.
    pub async fn update_structure_scores(
        pool: &PgPool,
        id: DbId,
        solvent_accessibility: Option<f64>,
        rc_score: Option<f64>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sequence_records \
             SET solvent_accessibility = COALESCE($2, solvent_accessibility), \
                 rc_score = COALESCE($3, rc_score), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(solvent_accessibility)
        .bind(rc_score)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Cache the external structure count on the record.
    pub async fn set_structure_num(
        pool: &PgPool,
        id: DbId,
        structure_num: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sequence_records SET structure_num = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(structure_num)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Records whose prediction finished but whose parameters were never
    /// stored, oldest first. Feeds the background enrichment retry.
    pub async fn find_missing_parameters(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<SequenceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequence_records \
             WHERE duration_secs IS NOT NULL AND molecular_weight IS NULL \
             ORDER BY updated_at ASC \
             LIMIT $1"
        );
        sqlx::query_as::<_, SequenceRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Ids of the cluster reachable from a root record: the root itself
    /// plus every record whose parent is the root, in id order.
    pub async fn cluster_ids(pool: &PgPool, root_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM sequence_records \
             WHERE id = $1 OR parent_id = $1 \
             ORDER BY id",
        )
        .bind(root_id)
        .fetch_all(pool)
        .await
    }
}
