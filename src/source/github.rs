//! GitHub REST event source.
//!
//! Reads `GET /users/{username}/events/public` and narrows each event's
//! payload by its `type` field.

use std::time::Duration;

use serde::Deserialize;

use crate::{
    http,
    model::{ActivityEvent, EventKind, PushPayload},
};

use super::{EventSource, FetchError};

/// Event source backed by the GitHub REST API.
pub struct GitHubEvents {
    api_url: String,
    agent: ureq::Agent,
}

impl GitHubEvents {
    /// Creates a source talking to `api_url` (e.g. `https://api.github.com`).
    pub fn new(api_url: &str, timeout: Duration) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            agent: http::agent(timeout),
        }
    }

    fn events_url(&self, username: &str) -> String {
        format!("{}/users/{username}/events/public", self.api_url)
    }
}

impl EventSource for GitHubEvents {
    fn public_events(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, FetchError> {
        let url = self.events_url(username);
        tracing::debug!(%url, limit, "requesting public events");

        let mut response = match self
            .agent
            .get(&url)
            .query("per_page", limit.to_string())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", http::USER_AGENT)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => return Err(FetchError::UserNotFound),
            Err(e) => return Err(FetchError::Failed(format!("GET {url} failed: {e}"))),
        };

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Failed(format!("failed to read event feed: {e}")))?;

        parse_events(&body)
    }
}

// ── Wire shapes ──

/// JSON shape of one entry in the events feed.
#[derive(Deserialize)]
struct GhEvent {
    #[serde(rename = "type")]
    kind: String,
    repo: GhRepo,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct GhRepo {
    name: String,
}

/// Parse a feed page into domain events.
fn parse_events(body: &str) -> Result<Vec<ActivityEvent>, FetchError> {
    let events: Vec<GhEvent> = serde_json::from_str(body)
        .map_err(|e| FetchError::Failed(format!("invalid event feed: {e}")))?;

    Ok(events.into_iter().map(GhEvent::into_domain).collect())
}

impl GhEvent {
    fn into_domain(self) -> ActivityEvent {
        let kind = if self.kind == "PushEvent" {
            let payload = serde_json::from_value::<PushPayload>(self.payload).unwrap_or_else(|e| {
                tracing::warn!(repo = %self.repo.name, "unreadable push payload: {e}");
                PushPayload::default()
            });
            EventKind::Push(payload)
        } else {
            EventKind::Other(self.kind)
        };

        ActivityEvent {
            repo_name: self.repo.name,
            kind,
        }
    }
}
