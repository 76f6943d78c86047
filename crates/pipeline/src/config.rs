//! Pipeline configuration loaded from environment variables.

use std::path::PathBuf;

/// External tool paths, storage locations, and scheduler timings.
///
/// All fields have defaults suitable for a development checkout with the
/// tools installed alongside the server; override via environment
/// variables in production.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scheduler poll period in seconds (default: `60`).
    pub poll_interval_secs: u64,
    /// Retention window for terminal queue entries, in hours (default: `24`).
    pub retention_hours: i64,
    /// Directory holding generated model files, one `<record_id>.pdb` each.
    pub models_dir: PathBuf,
    /// Root for per-tool scratch directories.
    pub work_root: PathBuf,

    /// `rpsblast` binary for the conserved-domain search.
    pub rpsblast_path: PathBuf,
    /// `rpsbproc` binary that post-processes the search output.
    pub rpsbproc_path: PathBuf,
    /// Conserved-domain database the search runs against.
    pub cdd_db_path: PathBuf,

    /// Shell profile that provides `conda activate` for the AlphaFold run.
    pub conda_sh: PathBuf,
    /// AlphaFold launcher script.
    pub alphafold_script: PathBuf,
    /// AlphaFold genetic database directory.
    pub alphafold_data_dir: PathBuf,

    /// I-TASSER launcher script.
    pub itasser_script: PathBuf,
    /// I-TASSER template library directory.
    pub itasser_lib_dir: PathBuf,

    /// ESMFold folding endpoint (fast path).
    pub esmfold_endpoint: String,
    /// RCSB search endpoint for the structure-count lookup.
    pub rcsb_endpoint: String,

    /// Optional script printing a solvent-accessibility score for a PDB file.
    pub solvent_accessibility_script: Option<PathBuf>,
    /// Optional script printing a Ramachandran score for a PDB file.
    pub rc_score_script: Option<PathBuf>,
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var | Default |
    /// |---|---|
    /// | `SCHEDULER_POLL_INTERVAL_SECS` | `60` |
    /// | `QUEUE_RETENTION_HOURS` | `24` |
    /// | `MODELS_DIR` | `static/models` |
    /// | `PIPELINE_WORK_DIR` | `work` |
    /// | `RPSBLAST_PATH` | `rpsblast` |
    /// | `RPSBPROC_PATH` | `rpsbproc` |
    /// | `CDD_DB_PATH` | `db/Cdd` |
    /// | `CONDA_SH` | `/opt/conda/etc/profile.d/conda.sh` |
    /// | `ALPHAFOLD_SCRIPT` | `run_alphafold.sh` |
    /// | `ALPHAFOLD_DATA_DIR` | `alphadata` |
    /// | `ITASSER_SCRIPT` | `runI-TASSER.pl` |
    /// | `ITASSER_LIB_DIR` | `itasser_lib` |
    /// | `ESMFOLD_ENDPOINT` | the ESM atlas fold endpoint |
    /// | `RCSB_ENDPOINT` | the RCSB search endpoint |
    /// | `SOLVENT_ACCESSIBILITY_SCRIPT` | unset |
    /// | `RC_SCORE_SCRIPT` | unset |
    pub fn from_env() -> Self {
        Self {
            poll_interval_secs: env_parse("SCHEDULER_POLL_INTERVAL_SECS", 60),
            retention_hours: env_parse("QUEUE_RETENTION_HOURS", 24),
            models_dir: env_path("MODELS_DIR", "static/models"),
            work_root: env_path("PIPELINE_WORK_DIR", "work"),
            rpsblast_path: env_path("RPSBLAST_PATH", "rpsblast"),
            rpsbproc_path: env_path("RPSBPROC_PATH", "rpsbproc"),
            cdd_db_path: env_path("CDD_DB_PATH", "db/Cdd"),
            conda_sh: env_path("CONDA_SH", "/opt/conda/etc/profile.d/conda.sh"),
            alphafold_script: env_path("ALPHAFOLD_SCRIPT", "run_alphafold.sh"),
            alphafold_data_dir: env_path("ALPHAFOLD_DATA_DIR", "alphadata"),
            itasser_script: env_path("ITASSER_SCRIPT", "runI-TASSER.pl"),
            itasser_lib_dir: env_path("ITASSER_LIB_DIR", "itasser_lib"),
            esmfold_endpoint: env_string(
                "ESMFOLD_ENDPOINT",
                "https://api.esmatlas.com/foldSequence/v1/pdb/",
            ),
            rcsb_endpoint: env_string(
                "RCSB_ENDPOINT",
                "https://search.rcsb.org/rcsbsearch/v2/query",
            ),
            solvent_accessibility_script: std::env::var("SOLVENT_ACCESSIBILITY_SCRIPT")
                .ok()
                .map(PathBuf::from),
            rc_score_script: std::env::var("RC_SCORE_SCRIPT").ok().map(PathBuf::from),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_string(key, default))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
