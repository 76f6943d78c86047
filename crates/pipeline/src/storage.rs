//! Canonical storage for generated model files.

use std::path::{Path, PathBuf};

use profold_core::types::DbId;

use crate::error::PipelineError;

/// Stores one model file per sequence record, named `<record_id>.pdb`.
///
/// Files are keyed by the record's identity, never by a queue entry's,
/// so repeated runs for the same sequence land on the same path.
#[derive(Debug, Clone)]
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Canonical path for a record's model file.
    pub fn model_path(&self, record_id: DbId) -> PathBuf {
        self.models_dir.join(format!("{record_id}.pdb"))
    }

    /// Move a tool's output file into the store.
    ///
    /// Falls back to copy-and-remove when a rename crosses filesystems.
    pub async fn adopt(&self, source: &Path, record_id: DbId) -> Result<PathBuf, PipelineError> {
        if !tokio::fs::try_exists(source).await? {
            return Err(PipelineError::MissingOutput(source.to_path_buf()));
        }
        tokio::fs::create_dir_all(&self.models_dir).await?;

        let dest = self.model_path(record_id);
        if tokio::fs::rename(source, &dest).await.is_err() {
            tokio::fs::copy(source, &dest).await?;
            tokio::fs::remove_file(source).await?;
        }
        Ok(dest)
    }

    /// Write model bytes received over the wire (fast path) directly
    /// into the store.
    pub async fn write(&self, record_id: DbId, bytes: &[u8]) -> Result<PathBuf, PipelineError> {
        tokio::fs::create_dir_all(&self.models_dir).await?;
        let dest = self.model_path(record_id);
        tokio::fs::write(&dest, bytes).await?;
        Ok(dest)
    }
}
