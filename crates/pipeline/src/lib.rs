//! The asynchronous prediction pipeline.
//!
//! Sequences enter through [`registry::SequenceRegistry`], which
//! deduplicates records and enrolls new ones into the per-tool queues
//! (or fires the synchronous ESMFold fast path). A single polling
//! [`scheduler::QueueScheduler`] admits at most one job per tool at a
//! time and dispatches it to a [`processor::JobProcessor`] as detached
//! work; completion feeds back into records and dependent work items.

pub mod config;
pub mod decomposer;
pub mod enrichment;
pub mod error;
pub mod esmfold;
pub mod predictor;
pub mod processor;
pub mod propagate;
pub mod registry;
pub mod scheduler;
pub mod storage;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::PipelineConfig;
use crate::decomposer::Decomposer;
use crate::enrichment::Enrichment;
use crate::esmfold::EsmFoldClient;
use crate::predictor::{AlphafoldPredictor, ItasserPredictor};
use crate::processor::JobProcessor;
use crate::registry::SequenceRegistry;
use crate::scheduler::QueueScheduler;
use crate::storage::ModelStore;

/// Fully wired pipeline, ready for the binary to mount.
pub struct Pipeline {
    pub registry: SequenceRegistry,
    pub decomposer: Decomposer,
    pub scheduler: QueueScheduler,
}

impl Pipeline {
    /// Wire every pipeline component from one config.
    pub fn new(pool: PgPool, config: &PipelineConfig) -> Self {
        let store = ModelStore::new(&config.models_dir);
        let enrichment = Arc::new(Enrichment::new(config, store.clone()));
        let esmfold = EsmFoldClient::new(&config.esmfold_endpoint);

        let processors = vec![
            Arc::new(JobProcessor::new(
                pool.clone(),
                Arc::new(AlphafoldPredictor::from_config(config)),
                store.clone(),
                Arc::clone(&enrichment),
            )),
            Arc::new(JobProcessor::new(
                pool.clone(),
                Arc::new(ItasserPredictor::from_config(config)),
                store.clone(),
                Arc::clone(&enrichment),
            )),
        ];

        let registry = SequenceRegistry::new(
            pool.clone(),
            esmfold,
            store.clone(),
            Arc::clone(&enrichment),
        );
        let decomposer = Decomposer::from_config(config);
        let scheduler = QueueScheduler::new(pool, processors, enrichment, config);

        Self {
            registry,
            decomposer,
            scheduler,
        }
    }

    /// Flag the status surface reads to report whether the scheduler
    /// loop is alive.
    pub fn scheduler_running(&self) -> Arc<AtomicBool> {
        self.scheduler.running_flag()
    }
}
