//! # Record Models
//!
//! The [`Record`] trait every persisted type implements, plus [`BaseModel`],
//! the id/timestamps/tombstone block most tables share.

pub mod base_model;
pub mod record;

// Re-export for easy access
pub use base_model::BaseModel;
pub use record::{Record, RecordId};
