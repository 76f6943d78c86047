//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row, plus any DTOs the repositories accept.

pub mod queue_entry;
pub mod sequence_record;
pub mod status;
pub mod work_item;
