//! Tool-specific knowledge for the two queued predictors.
//!
//! The [`Predictor`] trait is the seam between the generic job run in
//! `processor` and each tool's command line, input convention, and
//! output location.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use profold_db::models::queue_entry::QueueKind;

use crate::config::PipelineConfig;

pub trait Predictor: Send + Sync {
    fn kind(&self) -> QueueKind;

    /// Scratch directory for one run. Recreated clean before each job.
    fn work_dir(&self) -> &Path;

    /// Input FASTA file name the tool expects inside the work dir.
    fn input_file(&self) -> &'static str;

    /// FASTA header the tool expects for the query entry.
    fn fasta_header(&self) -> &'static str;

    /// The blocking prediction command, ready to spawn.
    fn command(&self) -> Command;

    /// Where the tool leaves its best model after a successful run.
    fn output_model(&self) -> PathBuf;
}

/// AlphaFold runs through its launcher script inside a conda env, so
/// the command goes through `bash -c` with the env sourced first.
pub struct AlphafoldPredictor {
    work_dir: PathBuf,
    conda_sh: PathBuf,
    script: PathBuf,
    data_dir: PathBuf,
}

impl AlphafoldPredictor {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            work_dir: config.work_root.join("alphafold"),
            conda_sh: config.conda_sh.clone(),
            script: config.alphafold_script.clone(),
            data_dir: config.alphafold_data_dir.clone(),
        }
    }
}

impl Predictor for AlphafoldPredictor {
    fn kind(&self) -> QueueKind {
        QueueKind::Alphafold
    }

    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn input_file(&self) -> &'static str {
        "query.fasta"
    }

    fn fasta_header(&self) -> &'static str {
        "query"
    }

    fn command(&self) -> Command {
        let script = format!(
            "source {} && conda activate alphafold && bash {} -d {} -o {} -f {} -t 2021-11-01 -g False -c reduced_dbs",
            self.conda_sh.display(),
            self.script.display(),
            self.data_dir.display(),
            self.work_dir.join("output").display(),
            self.work_dir.join(self.input_file()).display(),
        );
        let mut cmd = Command::new("bash");
        cmd.arg("-c").arg(script);
        cmd
    }

    fn output_model(&self) -> PathBuf {
        self.work_dir
            .join("output")
            .join("query")
            .join("unrelaxed_model_1.pdb")
    }
}

pub struct ItasserPredictor {
    work_dir: PathBuf,
    script: PathBuf,
    lib_dir: PathBuf,
}

impl ItasserPredictor {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            work_dir: config.work_root.join("itasser"),
            script: config.itasser_script.clone(),
            lib_dir: config.itasser_lib_dir.clone(),
        }
    }
}

impl Predictor for ItasserPredictor {
    fn kind(&self) -> QueueKind {
        QueueKind::Itasser
    }

    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn input_file(&self) -> &'static str {
        "seq.fasta"
    }

    fn fasta_header(&self) -> &'static str {
        "seq"
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.script);
        cmd.arg("-libdir")
            .arg(&self.lib_dir)
            .args(["-seqname", "seq"])
            .arg("-datadir")
            .arg(&self.work_dir)
            // Light mode, single model, bounded runtime per template stage.
            .args(["-light", "true", "-nmodel", "1", "-hours", "2"]);
        cmd
    }

    fn output_model(&self) -> PathBuf {
        self.work_dir.join("model1.pdb")
    }
}
