//! Event sources: where a user's public activity comes from.
//!
//! The pipeline only sees the [`EventSource`] trait. The GitHub REST
//! implementation lives in its own submodule; tests substitute fakes.

mod github;

pub use github::GitHubEvents;

use crate::model::ActivityEvent;

/// Most events requested in one page. Older history is never consulted.
pub const EVENT_PAGE_SIZE: usize = 100;

/// Why a page of events could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("user not found")]
    UserNotFound,

    #[error("{0}")]
    Failed(String),
}

/// Supplies a user's public activity, newest first.
pub trait EventSource {
    /// Fetch up to `limit` of the most recent public events for `username`.
    fn public_events(&self, username: &str, limit: usize)
    -> Result<Vec<ActivityEvent>, FetchError>;
}
