//! Sequence decomposition via the conserved-domain search tool.
//!
//! Runs `rpsblast` against the CDD database, post-processes the result
//! with `rpsbproc`, and slices the query into annotated subsequences
//! from the parsed domain table (`core::domains`).

use std::path::PathBuf;

use tokio::process::Command;

use profold_core::domains::{self, AnnotatedSubsequence};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// File names inside the decomposer scratch directory.
const QUERY_FILE: &str = "query.txt";
const ASN_FILE: &str = "query.asn";
const REPORT_FILE: &str = "query.out";

/// E-value threshold for both search stages.
const EVALUE: &str = "0.01";

pub struct Decomposer {
    work_dir: PathBuf,
    rpsblast: PathBuf,
    rpsbproc: PathBuf,
    cdd_db: PathBuf,
}

impl Decomposer {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            work_dir: config.work_root.join("domain_search"),
            rpsblast: config.rpsblast_path.clone(),
            rpsbproc: config.rpsbproc_path.clone(),
            cdd_db: config.cdd_db_path.clone(),
        }
    }

    /// Decompose a sequence into its top-ranked annotated subsequences.
    ///
    /// Zero usable hits is [`PipelineError::NoDomainHits`]; the caller
    /// must distinguish that from a successful empty decomposition,
    /// which does not exist.
    pub async fn decompose(
        &self,
        sequence: &str,
    ) -> Result<Vec<AnnotatedSubsequence>, PipelineError> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let query_path = self.work_dir.join(QUERY_FILE);
        let asn_path = self.work_dir.join(ASN_FILE);
        let report_path = self.work_dir.join(REPORT_FILE);
        tokio::fs::write(&query_path, sequence).await?;

        let search = Command::new(&self.rpsblast)
            .arg("-query")
            .arg(&query_path)
            .arg("-db")
            .arg(&self.cdd_db)
            .args(["-evalue", EVALUE, "-outfmt", "11"])
            .arg("-out")
            .arg(&asn_path)
            .output()
            .await?;
        if !search.status.success() {
            return Err(tool_failure("rpsblast", &search));
        }

        let post = Command::new(&self.rpsbproc)
            .arg("-i")
            .arg(&asn_path)
            .arg("-o")
            .arg(&report_path)
            .args(["-e", EVALUE, "-m", "std", "-t", "doms"])
            .output()
            .await?;
        if !post.status.success() {
            return Err(tool_failure("rpsbproc", &post));
        }

        let report = tokio::fs::read_to_string(&report_path).await?;
        let hits = domains::parse_domain_table(&report)?;
        tracing::debug!(hits = hits.len(), "Domain search finished");

        Ok(domains::annotated_subsequences(sequence, &hits))
    }
}

fn tool_failure(tool: &'static str, output: &std::process::Output) -> PipelineError {
    PipelineError::ToolFailed {
        tool,
        exit_code: output.status.code(),
        output: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
