//! Sequence record entity: one unique biological sequence and its
//! computed properties.

use serde::Serialize;
use sqlx::FromRow;

use profold_core::types::{DbId, Timestamp};

/// A row from the `sequence_records` table.
///
/// `parent_id` is a plain back-reference to the record this sequence was
/// derived from; it never implies ownership. The biochemical fields are
/// populated after a prediction finishes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SequenceRecord {
    pub id: DbId,
    pub sequence: String,
    pub parent_id: Option<DbId>,
    /// Opaque serialized decomposition annotation (positions, accession).
    pub domain_info: Option<String>,
    pub hydrophobicity: Option<f64>,
    pub instability: Option<f64>,
    pub isoelectric_point: Option<f64>,
    pub molecular_weight: Option<f64>,
    pub solvent_accessibility: Option<f64>,
    pub rc_score: Option<f64>,
    /// Count of known structures for this sequence in the external
    /// archive; 0 means not yet looked up.
    pub structure_num: i32,
    /// Wall-clock duration of the prediction run, in seconds.
    pub duration_secs: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SequenceRecord {
    /// The aggregation key for completion propagation: the parent record
    /// if this is a subsequence, otherwise the record itself.
    pub fn root_id(&self) -> DbId {
        self.parent_id.unwrap_or(self.id)
    }
}
