//! Preview images: ask a link-preview service for a commit's image.
//!
//! The service is called as `GET <endpoint>?url=<commit url>` and answers
//! with JSON carrying `data.image`, either as a URL string or as an object
//! with a `url` field.

use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::http;

/// Default preview service.
pub const DEFAULT_ENDPOINT: &str = "https://api.microlink.io/";

/// Why no preview image could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("preview service answered with status {0}")]
    Status(u16),

    #[error("preview request failed: {0}")]
    Request(String),

    #[error("invalid preview response: {0}")]
    InvalidResponse(String),

    #[error("preview response has no image")]
    MissingImage,
}

/// When to render the image preview, and what a failed lookup means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewMode {
    /// Plain text line only; the preview service is never called.
    #[default]
    Off,
    /// Image preview; a failed lookup fails the run.
    Required,
    /// Image preview when available, plain line otherwise.
    Fallback,
}

/// Resolves a preview image for a commit page.
pub trait PreviewFetcher {
    /// Image URL for the page at `commit_url`.
    fn fetch_image(&self, commit_url: &str) -> Result<String, PreviewError>;
}

/// Preview fetcher backed by an HTTP link-preview service.
pub struct HttpPreview {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpPreview {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: http::agent(timeout),
        }
    }
}

impl PreviewFetcher for HttpPreview {
    fn fetch_image(&self, commit_url: &str) -> Result<String, PreviewError> {
        tracing::debug!(endpoint = %self.endpoint, %commit_url, "requesting preview");

        let mut response = match self
            .agent
            .get(&self.endpoint)
            .query("url", commit_url)
            .header("User-Agent", http::USER_AGENT)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => return Err(PreviewError::Status(code)),
            Err(e) => return Err(PreviewError::Request(e.to_string())),
        };

        let status = response.status().as_u16();
        if status != 200 {
            return Err(PreviewError::Status(status));
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| PreviewError::Request(e.to_string()))?;

        parse_image(&body)
    }
}

// ── Wire shapes ──

#[derive(Deserialize)]
struct PreviewResponse {
    data: Option<PreviewData>,
}

#[derive(Deserialize)]
struct PreviewData {
    image: Option<ImageField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageField {
    Url(String),
    Object { url: String },
}

/// Pull the image URL out of a preview response body.
fn parse_image(body: &str) -> Result<String, PreviewError> {
    let response: PreviewResponse =
        serde_json::from_str(body).map_err(|e| PreviewError::InvalidResponse(e.to_string()))?;

    let url = match response.data.and_then(|d| d.image) {
        Some(ImageField::Url(url) | ImageField::Object { url }) => url,
        None => return Err(PreviewError::MissingImage),
    };

    if url.is_empty() {
        Err(PreviewError::MissingImage)
    } else {
        Ok(url)
    }
}
