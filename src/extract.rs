//! Commit extraction: find the newest pushed commit in a user's feed.

use crate::{
    model::{ActivityEvent, CommitRecord, ExtractionOutcome},
    source::{EVENT_PAGE_SIZE, EventSource},
};

/// Look up the latest commit `username` pushed.
///
/// Reads one page of public events and takes the first commit of the
/// newest push that has any. The caller rejects empty usernames.
pub fn latest_commit(username: &str, source: &dyn EventSource) -> ExtractionOutcome {
    tracing::info!("Fetching recent public activity for {username}");

    let events = match source.public_events(username, EVENT_PAGE_SIZE) {
        Ok(events) => events,
        Err(e) => return ExtractionOutcome::SourceUnavailable(e),
    };

    tracing::debug!(count = events.len(), "received events");

    match first_pushed_commit(&events) {
        Some(record) => ExtractionOutcome::Success(record),
        None => ExtractionOutcome::NotFound,
    }
}

/// Scan events in the given order for the first push carrying commits.
///
/// Returns that push's first listed commit. Pushes with no commits, or
/// whose commit or repository is unnamed, are skipped.
pub fn first_pushed_commit(events: &[ActivityEvent]) -> Option<CommitRecord> {
    events.iter().find_map(|event| {
        let Some(push) = event.as_push() else {
            tracing::trace!(kind = event.kind_name(), repo = %event.repo_name, "skipping event");
            return None;
        };
        let commit = push.commits.first()?;
        if commit.sha.is_empty() || event.repo_name.is_empty() {
            tracing::debug!(repo = %event.repo_name, "skipping push without sha or repository");
            return None;
        }
        Some(CommitRecord {
            message: commit.message.clone(),
            repo_name: event.repo_name.clone(),
            sha: commit.sha.clone(),
        })
    })
}
