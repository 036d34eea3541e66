//! Activity events: what a user's public feed is made of.

use serde::Deserialize;

/// One entry of a user's public activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    /// `owner/name` of the repository the event happened in.
    pub repo_name: String,

    /// What happened, narrowed by kind.
    pub kind: EventKind,
}

/// Event kinds, keyed by the feed's `type` discriminator.
///
/// Only pushes carry a typed payload. Everything else keeps its raw kind
/// name for logging and is otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `PushEvent`: one or more commits pushed to a branch.
    Push(PushPayload),

    /// Any other kind, e.g. `WatchEvent` or `IssuesEvent`.
    Other(String),
}

/// Payload of a push event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    /// Commits in push order: oldest first.
    #[serde(default)]
    pub commits: Vec<PushCommit>,
}

/// A commit descriptor inside a push payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushCommit {
    pub sha: String,
    pub message: String,
}

impl ActivityEvent {
    /// A push event in `repo_name` carrying the given commits.
    #[cfg(test)]
    pub fn push(repo_name: impl Into<String>, commits: Vec<PushCommit>) -> Self {
        Self {
            repo_name: repo_name.into(),
            kind: EventKind::Push(PushPayload { commits }),
        }
    }

    /// A non-push event of the given kind.
    #[cfg(test)]
    pub fn other(repo_name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            kind: EventKind::Other(kind.into()),
        }
    }

    /// The push payload, if this is a push event.
    pub fn as_push(&self) -> Option<&PushPayload> {
        match &self.kind {
            EventKind::Push(payload) => Some(payload),
            EventKind::Other(_) => None,
        }
    }

    /// The feed's name for this event's kind.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            EventKind::Push(_) => "PushEvent",
            EventKind::Other(kind) => kind,
        }
    }
}

#[cfg(test)]
impl PushCommit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }
}
