//! Shared HTTP agent setup for the event source and the preview service.

use std::time::Duration;

/// Sent on every request; GitHub rejects requests without a user agent.
pub const USER_AGENT: &str = concat!("latest-commit/", env!("CARGO_PKG_VERSION"));

/// Build a blocking agent that gives up on any request after `timeout`.
pub fn agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}
