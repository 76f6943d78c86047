//! Integration tests for submission, job failure handling, and the
//! processor's terminal transitions.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use profold_core::tool::PredictorTool;
use profold_db::models::queue_entry::QueueKind;
use profold_db::models::status::QueueStatus;
use profold_db::repositories::{PredictionQueueRepo, SequenceRecordRepo};
use profold_pipeline::config::PipelineConfig;
use profold_pipeline::enrichment::Enrichment;
use profold_pipeline::esmfold::EsmFoldClient;
use profold_pipeline::predictor::ItasserPredictor;
use profold_pipeline::processor::JobProcessor;
use profold_pipeline::registry::SequenceRegistry;
use profold_pipeline::storage::ModelStore;

const SEQ: &str = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ";

/// Config pointing every external tool at paths that do not exist, so
/// any attempt to actually run one fails fast.
fn test_config(scratch: &str) -> PipelineConfig {
    let root = std::env::temp_dir().join("profold-tests").join(scratch);
    PipelineConfig {
        poll_interval_secs: 1,
        retention_hours: 24,
        models_dir: root.join("models"),
        work_root: root.join("work"),
        rpsblast_path: PathBuf::from("/nonexistent/rpsblast"),
        rpsbproc_path: PathBuf::from("/nonexistent/rpsbproc"),
        cdd_db_path: PathBuf::from("/nonexistent/Cdd"),
        conda_sh: PathBuf::from("/nonexistent/conda.sh"),
        alphafold_script: PathBuf::from("/nonexistent/run_alphafold.sh"),
        alphafold_data_dir: PathBuf::from("/nonexistent/alphadata"),
        itasser_script: PathBuf::from("/nonexistent/runI-TASSER.pl"),
        itasser_lib_dir: PathBuf::from("/nonexistent/itasser_lib"),
        esmfold_endpoint: "http://127.0.0.1:9/".to_string(),
        rcsb_endpoint: "http://127.0.0.1:9/".to_string(),
        solvent_accessibility_script: None,
        rc_score_script: None,
    }
}

fn registry(pool: &PgPool, config: &PipelineConfig) -> SequenceRegistry {
    let store = ModelStore::new(&config.models_dir);
    let enrichment = Arc::new(Enrichment::new(config, store.clone()));
    SequenceRegistry::new(
        pool.clone(),
        EsmFoldClient::new(&config.esmfold_endpoint),
        store,
        enrichment,
    )
}

fn itasser_processor(pool: &PgPool, config: &PipelineConfig) -> JobProcessor {
    let store = ModelStore::new(&config.models_dir);
    let enrichment = Arc::new(Enrichment::new(config, store.clone()));
    JobProcessor::new(
        pool.clone(),
        Arc::new(ItasserPredictor::from_config(config)),
        store,
        enrichment,
    )
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_creates_record_and_enrolls_once(pool: PgPool) {
    let config = test_config("submit-dedup");
    let registry = registry(&pool, &config);

    let first = registry
        .submit(SEQ, None, None, PredictorTool::Alphafold)
        .await
        .unwrap();
    assert!(first.created);
    assert!(first.queue_entry_id.is_some());

    // Resubmitting resolves to the same record and enrolls nothing new.
    let second = registry
        .submit(SEQ, None, None, PredictorTool::Alphafold)
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.record.id, first.record.id);
    assert!(second.queue_entry_id.is_none());

    let counts = PredictionQueueRepo::status_counts(&pool, QueueKind::Alphafold)
        .await
        .unwrap();
    assert_eq!(counts.pending, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_with_other_tool_enrolls_in_its_own_queue(pool: PgPool) {
    let config = test_config("submit-two-tools");
    let registry = registry(&pool, &config);

    let af = registry
        .submit(SEQ, None, None, PredictorTool::Alphafold)
        .await
        .unwrap();
    let it = registry
        .submit(SEQ, None, None, PredictorTool::Itasser)
        .await
        .unwrap();

    // One record; two independent queue enrollments.
    assert_eq!(af.record.id, it.record.id);
    assert!(af.queue_entry_id.is_some());
    assert!(it.queue_entry_id.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_sequence_fails_without_running_the_tool(pool: PgPool) {
    let config = test_config("invalid-seq");
    // Bypass the registry: simulate a legacy entry whose sequence would
    // not pass today's validation.
    let entry = PredictionQueueRepo::enroll(&pool, QueueKind::Itasser, "MKTAZZZB", None)
        .await
        .unwrap()
        .unwrap();
    let claimed = PredictionQueueRepo::claim_oldest_pending(&pool, QueueKind::Itasser)
        .await
        .unwrap()
        .unwrap();

    itasser_processor(&pool, &config).run(claimed).await;

    let after = PredictionQueueRepo::find_by_id(&pool, QueueKind::Itasser, entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, QueueStatus::Failed.id());
    // The rejection happened before the scratch dir was even created.
    assert!(!config.work_root.join("itasser").exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tool_launch_failure_marks_entry_failed(pool: PgPool) {
    let config = test_config("tool-missing");
    SequenceRecordRepo::create(&pool, SEQ, None, None)
        .await
        .unwrap();
    let entry = PredictionQueueRepo::enroll(&pool, QueueKind::Itasser, SEQ, None)
        .await
        .unwrap()
        .unwrap();
    let claimed = PredictionQueueRepo::claim_oldest_pending(&pool, QueueKind::Itasser)
        .await
        .unwrap()
        .unwrap();

    itasser_processor(&pool, &config).run(claimed).await;

    let after = PredictionQueueRepo::find_by_id(&pool, QueueKind::Itasser, entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, QueueStatus::Failed.id());

    // The record stays untouched for a later retry.
    let record = SequenceRecordRepo::find_by_scope(&pool, SEQ, None)
        .await
        .unwrap()
        .unwrap();
    assert!(record.duration_secs.is_none());
}
