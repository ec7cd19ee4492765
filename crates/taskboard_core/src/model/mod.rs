//! Task board domain model.
//!
//! # Responsibility
//! - Define the canonical task shape used by the board and every store.
//! - Own the translation between board columns and the three-flag wire
//!   status representation.
//!
//! # Invariants
//! - In memory, a task's placement is exactly one `Column` variant.
//! - Flag triples are collapsed to a column only at decode time, with
//!   precedence `completed > inReview > inProgress > none`.

pub mod record;
pub mod task;
