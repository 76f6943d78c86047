//! Structure-prediction tool identifiers.

use serde::{Deserialize, Serialize};

/// The external programs that compute a 3D structure from a sequence.
///
/// AlphaFold and I-TASSER run for minutes to hours and go through the
/// per-tool queues; ESMFold is a low-latency HTTP call and bypasses
/// queuing entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorTool {
    Alphafold,
    Itasser,
    Esmfold,
}

impl PredictorTool {
    /// Stable lowercase name used in logs and API payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            PredictorTool::Alphafold => "alphafold",
            PredictorTool::Itasser => "itasser",
            PredictorTool::Esmfold => "esmfold",
        }
    }

    /// The two tools that have a backing queue.
    pub const QUEUED: [PredictorTool; 2] = [PredictorTool::Alphafold, PredictorTool::Itasser];

    /// Whether jobs for this tool go through a queue.
    pub fn is_queued(self) -> bool {
        !matches!(self, PredictorTool::Esmfold)
    }
}

impl std::fmt::Display for PredictorTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
