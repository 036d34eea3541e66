//! Rendering a commit record into the fragment placed in the document.
//!
//! Pure string work: no I/O, deterministic.

use crate::model::CommitRecord;

/// Messages longer than this are truncated.
const MAX_MESSAGE_CHARS: usize = 50;

/// Characters kept from a truncated message, before the ellipsis.
const TRUNCATED_CHARS: usize = 45;

const ELLIPSIS: &str = "...";

/// Length of the abbreviated sha used in link labels.
const SHORT_SHA_CHARS: usize = 7;

/// One-line summary: `"<message> <repo>@<sha>"`.
pub fn format_line(commit: &CommitRecord) -> String {
    format!(
        "{} {}@{}",
        truncate_message(&commit.message),
        commit.repo_name,
        commit.sha
    )
}

/// Markdown image linking to the commit, plus the link definition.
///
/// ```text
/// [![owner/repo@abc1234](<image>)][owner/repo@abc1234]
///
/// [owner/repo@abc1234]: https://github.com/owner/repo/commit/<sha>
/// ```
pub fn format_preview(commit: &CommitRecord, image_url: &str, host: &str) -> String {
    let label = format!("{}@{}", commit.repo_name, short_sha(&commit.sha));
    let url = commit_url(commit, host);
    format!("[![{label}]({image_url})][{label}]\n\n[{label}]: {url}")
}

/// Canonical web URL of a commit on `host`.
pub fn commit_url(commit: &CommitRecord, host: &str) -> String {
    format!("https://{host}/{}/commit/{}", commit.repo_name, commit.sha)
}

/// Shorten messages over the limit, counting characters rather than bytes.
fn truncate_message(message: &str) -> String {
    if message.chars().count() > MAX_MESSAGE_CHARS {
        let kept: String = message.chars().take(TRUNCATED_CHARS).collect();
        format!("{kept}{ELLIPSIS}")
    } else {
        message.to_string()
    }
}

fn short_sha(sha: &str) -> &str {
    sha.char_indices()
        .nth(SHORT_SHA_CHARS)
        .map_or(sha, |(i, _)| &sha[..i])
}
