pub mod queue;
pub mod sequences;
