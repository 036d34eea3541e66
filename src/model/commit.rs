//! The canonical commit record and the outcome of looking for one.

use crate::source::FetchError;

/// The newest pushed commit, normalized for formatting.
///
/// `sha` and `repo_name` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub message: String,
    pub repo_name: String,
    pub sha: String,
}

/// Result of scanning a user's feed for their latest commit.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// A qualifying push was found.
    Success(CommitRecord),

    /// The feed was read but held no push with commits.
    NotFound,

    /// The feed could not be read at all.
    SourceUnavailable(FetchError),
}
