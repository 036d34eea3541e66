//! Core data model for latest-commit.
//!
//! Activity events as the event source hands them over, and the canonical
//! commit record everything downstream of extraction works with.

mod commit;
mod event;

pub use commit::{CommitRecord, ExtractionOutcome};
pub use event::{ActivityEvent, EventKind, PushCommit, PushPayload};
