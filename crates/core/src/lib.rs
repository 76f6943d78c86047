//! Pure domain logic for the profold prediction pipeline.
//!
//! This crate has no internal dependencies and no I/O. Everything here is
//! deterministic and unit-testable: sequence validation, decomposition
//! output parsing, and the biochemical parameter formulas.

pub mod domains;
pub mod error;
pub mod params;
pub mod sequence;
pub mod tool;
pub mod types;
