//! Pipeline error type.

use std::path::PathBuf;

use profold_core::domains::DomainError;
use profold_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("sequence contains characters outside the 20 standard amino-acid letters")]
    InvalidSequence,

    #[error("domain search produced no usable hits")]
    NoDomainHits,

    #[error("malformed domain report: {0}")]
    MalformedDomainReport(String),

    #[error("{tool} exited with code {exit_code:?}: {output}")]
    ToolFailed {
        tool: &'static str,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("expected tool output missing: {0}")]
    MissingOutput(PathBuf),

    #[error("no sequence record found for queue entry sequence (entry {0})")]
    RecordMissing(DbId),

    #[error("upstream service returned status {0}")]
    UpstreamStatus(u16),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<DomainError> for PipelineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NoHits => PipelineError::NoDomainHits,
            DomainError::Malformed(msg) => PipelineError::MalformedDomainReport(msg),
        }
    }
}
