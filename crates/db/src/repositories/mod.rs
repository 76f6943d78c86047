//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod queue_repo;
pub mod sequence_record_repo;
pub mod work_item_repo;

pub use queue_repo::PredictionQueueRepo;
pub use sequence_record_repo::SequenceRecordRepo;
pub use work_item_repo::WorkItemRepo;
