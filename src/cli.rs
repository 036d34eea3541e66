//! Command-line interface for latest-commit.
//!
//! One non-interactive command: flags in, one summary line out. Every flag
//! is optional and overrides the matching config file key. The username
//! and document also read the CI runner's `INPUT_*` variables, so the
//! binary can run as a workflow step unchanged.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{FileConfig, Settings},
    preview::PreviewMode,
};

/// Show your latest pushed commit in your README.
#[derive(Debug, Parser)]
#[command(name = "latest-commit", version, after_long_help = USAGE_HELP)]
pub struct Cli {
    /// GitHub user whose latest push is shown.
    #[arg(long, short, env = "INPUT_GH_USERNAME")]
    pub username: Option<String>,

    /// Document containing the LATESTCOMMIT markers. Defaults to `README.md`.
    #[arg(long, env = "INPUT_README")]
    pub readme: Option<PathBuf>,

    /// Render an image preview of the commit page. Defaults to `off`.
    ///
    /// `off` writes the plain line and never calls the preview service.
    /// `required` fails the run when the preview lookup fails.
    /// `fallback` logs a warning and writes the plain line instead.
    #[arg(long, value_enum)]
    pub preview: Option<PreviewMode>,

    /// Link-preview service queried with `?url=<commit url>`.
    #[arg(long)]
    pub preview_endpoint: Option<String>,

    /// Web host used in commit links (e.g. a GitHub Enterprise host).
    #[arg(long)]
    pub host: Option<String>,

    /// REST API base URL serving the event feed.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Commit locally but do not push.
    #[arg(long)]
    pub no_push: bool,

    /// Print the patched document instead of writing and committing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to use instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug detail to stderr.
    #[arg(long, short)]
    pub verbose: bool,
}

const USAGE_HELP: &str = r#"The document must contain both marker lines:

  <!-- LATESTCOMMIT:START -->
  <!-- LATESTCOMMIT:END -->

Everything between them is replaced on each run. Nothing is committed
when the region already shows the latest commit.

Examples:
  latest-commit --username octocat
  latest-commit --username octocat --preview fallback --no-push
  latest-commit --username octocat --dry-run"#;

impl Cli {
    /// Layer these flags over the config file.
    pub fn settings(&self, file: FileConfig) -> Settings {
        let mut settings = Settings::from_file(file);

        if let Some(username) = &self.username {
            settings.username.clone_from(username);
        }
        if let Some(readme) = &self.readme {
            settings.readme.clone_from(readme);
        }
        if let Some(preview) = self.preview {
            settings.preview = preview;
        }
        if let Some(endpoint) = &self.preview_endpoint {
            settings.preview_endpoint.clone_from(endpoint);
        }
        if let Some(host) = &self.host {
            settings.host.clone_from(host);
        }
        if let Some(api_url) = &self.api_url {
            settings.api_url.clone_from(api_url);
        }
        if self.no_push {
            settings.push = false;
        }
        settings.dry_run = self.dry_run;

        settings
    }
}
