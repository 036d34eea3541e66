//! The run driver: extract, format, patch, publish.
//!
//! Each stage returns an explicit result and the driver stops at the first
//! failure, so nothing is written unless every earlier stage succeeded and
//! the patch actually changed the document.

use crate::{
    config::Settings,
    extract,
    format::{commit_url, format_line, format_preview},
    model::{CommitRecord, ExtractionOutcome},
    patch::{self, PatchError, PatchOutcome},
    preview::{PreviewError, PreviewFetcher, PreviewMode},
    publish::{PublishError, Publisher},
    source::{EventSource, FetchError},
};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("could not read public activity for {username}: {source}")]
    SourceUnavailable {
        username: String,
        #[source]
        source: FetchError,
    },

    #[error("no recent push with commits found for {0}")]
    NoPushEvent(String),

    #[error(transparent)]
    Document(#[from] PatchError),

    #[error("preview unavailable: {0}")]
    PreviewUnavailable(#[source] PreviewError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The document was changed and published.
    Updated(CommitRecord),

    /// The document already showed this commit; nothing was published.
    Unchanged(CommitRecord),

    /// The document would change; `document` is the patched text.
    DryRun {
        commit: CommitRecord,
        document: String,
    },
}

/// The stages of a run, wired to their external collaborators.
pub struct Pipeline<'a> {
    source: &'a dyn EventSource,
    preview: &'a dyn PreviewFetcher,
    publisher: &'a dyn Publisher,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn EventSource,
        preview: &'a dyn PreviewFetcher,
        publisher: &'a dyn Publisher,
    ) -> Self {
        Self {
            source,
            preview,
            publisher,
        }
    }

    /// Run every stage once against `settings`.
    pub fn run(&self, settings: &Settings) -> Result<RunOutcome, RunError> {
        let username = settings.username.trim();
        if username.is_empty() {
            return Err(RunError::Configuration(
                "a GitHub username is required: pass --username, set INPUT_GH_USERNAME, \
                 or add `username = \"...\"` to the config file"
                    .to_string(),
            ));
        }

        let commit = match extract::latest_commit(username, self.source) {
            ExtractionOutcome::Success(commit) => commit,
            ExtractionOutcome::NotFound => return Err(RunError::NoPushEvent(username.to_string())),
            ExtractionOutcome::SourceUnavailable(source) => {
                return Err(RunError::SourceUnavailable {
                    username: username.to_string(),
                    source,
                });
            }
        };
        tracing::info!(repo = %commit.repo_name, sha = %commit.sha, "Found latest commit");

        let fragment = self.render(&commit, settings)?;

        let document = patch::read_document(&settings.readme)?;
        let patched = match patch::patch(&document, &fragment)? {
            PatchOutcome::Unchanged => {
                tracing::info!(path = %settings.readme.display(), "Document already up to date");
                return Ok(RunOutcome::Unchanged(commit));
            }
            PatchOutcome::Changed(patched) => patched,
        };

        if settings.dry_run {
            return Ok(RunOutcome::DryRun {
                commit,
                document: patched,
            });
        }

        self.publisher.publish(&settings.readme, &patched, &commit)?;
        Ok(RunOutcome::Updated(commit))
    }

    /// Build the fragment, consulting the preview service if enabled.
    fn render(&self, commit: &CommitRecord, settings: &Settings) -> Result<String, RunError> {
        if settings.preview == PreviewMode::Off {
            return Ok(format_line(commit));
        }

        let url = commit_url(commit, &settings.host);
        match self.preview.fetch_image(&url) {
            Ok(image) => Ok(format_preview(commit, &image, &settings.host)),
            Err(e) if settings.preview == PreviewMode::Fallback => {
                tracing::warn!("Preview unavailable, using plain line: {e}");
                Ok(format_line(commit))
            }
            Err(e) => Err(RunError::PreviewUnavailable(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs, path::PathBuf};

    use tempfile::TempDir;

    use crate::{
        model::{ActivityEvent, PushCommit},
        patch::Malformation,
        testing::{FakeEvents, FakePreview, RecordingPublisher},
    };

    const README: &str = "# Hi\n<!-- LATESTCOMMIT:START -->\nold\n<!-- LATESTCOMMIT:END -->\nbye\n";

    fn feed() -> FakeEvents {
        FakeEvents::page(vec![
            ActivityEvent::other("octo/stars", "WatchEvent"),
            ActivityEvent::push("octo/cat", vec![PushCommit::new("abc1234567", "Fix widget")]),
        ])
    }

    fn collaborators() -> (FakeEvents, FakePreview, RecordingPublisher) {
        (feed(), FakePreview::failing(), RecordingPublisher::default())
    }

    fn expected_commit() -> CommitRecord {
        CommitRecord {
            message: "Fix widget".into(),
            repo_name: "octo/cat".into(),
            sha: "abc1234567".into(),
        }
    }

    fn workspace(contents: &str) -> (TempDir, Settings) {
        let dir = TempDir::new().unwrap();
        let readme = dir.path().join("README.md");
        fs::write(&readme, contents).unwrap();
        let settings = Settings {
            username: "octocat".into(),
            readme,
            ..Settings::default()
        };
        (dir, settings)
    }

    #[test]
    fn updates_and_publishes() {
        let (_dir, settings) = workspace(README);
        let (source, preview, publisher) = collaborators();

        let outcome = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        assert_eq!(outcome, RunOutcome::Updated(expected_commit()));
        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, settings.readme);
        assert_eq!(
            published[0].1,
            "# Hi\n<!-- LATESTCOMMIT:START -->\nFix widget octo/cat@abc1234567\n<!-- LATESTCOMMIT:END -->\nbye\n"
        );
        assert!(preview.requests().is_empty());
    }

    #[test]
    fn up_to_date_document_is_not_published() {
        let current =
            "# Hi\n<!-- LATESTCOMMIT:START -->\nFix widget octo/cat@abc1234567\n<!-- LATESTCOMMIT:END -->\nbye\n";
        let (_dir, settings) = workspace(current);
        let (source, preview, publisher) = collaborators();

        let outcome = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        assert_eq!(outcome, RunOutcome::Unchanged(expected_commit()));
        assert!(publisher.published().is_empty());
    }

    #[test]
    fn empty_username_makes_no_requests() {
        let (_dir, mut settings) = workspace(README);
        settings.username = "   ".into();
        let (source, preview, publisher) = collaborators();

        let err = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap_err();

        assert!(matches!(err, RunError::Configuration(_)));
        assert!(source.requests().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[test]
    fn no_push_event_is_reported() {
        let (_dir, settings) = workspace(README);
        let source = FakeEvents::page(vec![ActivityEvent::other("octo/cat", "ForkEvent")]);
        let (preview, publisher) = (FakePreview::failing(), RecordingPublisher::default());

        let err = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap_err();

        assert!(matches!(err, RunError::NoPushEvent(user) if user == "octocat"));
        assert!(publisher.published().is_empty());
    }

    #[test]
    fn unknown_user_is_reported() {
        let (_dir, settings) = workspace(README);
        let source = FakeEvents::failing(FetchError::UserNotFound);
        let (preview, publisher) = (FakePreview::failing(), RecordingPublisher::default());

        let err = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "could not read public activity for octocat: user not found"
        );
    }

    #[test]
    fn missing_document_is_reported() {
        let (dir, mut settings) = workspace(README);
        settings.readme = dir.path().join("PROFILE.md");
        let (source, preview, publisher) = collaborators();

        let err = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap_err();

        assert!(matches!(err, RunError::Document(PatchError::DocumentNotFound(p)) if p == settings.readme));
    }

    #[test]
    fn malformed_document_is_left_alone() {
        let original = "# Hi\n<!-- LATESTCOMMIT:START -->\nold\n";
        let (_dir, settings) = workspace(original);
        let (source, preview, publisher) = collaborators();

        let err = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap_err();

        assert!(matches!(
            err,
            RunError::Document(PatchError::MalformedDocument(Malformation::MissingEnd))
        ));
        assert_eq!(fs::read_to_string(&settings.readme).unwrap(), original);
        assert!(publisher.published().is_empty());
    }

    #[test]
    fn dry_run_returns_document_without_publishing() {
        let (_dir, mut settings) = workspace(README);
        settings.dry_run = true;
        let (source, preview, publisher) = collaborators();

        let outcome = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        let (commit, document) = match outcome {
            RunOutcome::DryRun { commit, document } => (commit, document),
            other => panic!("expected dry run, got {other:?}"),
        };
        assert_eq!(commit, expected_commit());
        assert_eq!(patch::region(&document).unwrap(), "Fix widget octo/cat@abc1234567");
        assert!(publisher.published().is_empty());
        assert_eq!(fs::read_to_string(&settings.readme).unwrap(), README);
    }

    #[test]
    fn preview_renders_image_block() {
        let (_dir, mut settings) = workspace(README);
        settings.preview = PreviewMode::Required;
        let (source, preview, publisher) = (
            feed(),
            FakePreview::image("https://img.example/p.png"),
            RecordingPublisher::default(),
        );

        Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        assert_eq!(
            preview.requests(),
            vec!["https://github.com/octo/cat/commit/abc1234567".to_string()]
        );
        let published = publisher.published();
        assert_eq!(
            patch::region(&published[0].1).unwrap(),
            "[![octo/cat@abc1234](https://img.example/p.png)][octo/cat@abc1234]\n\
             \n\
             [octo/cat@abc1234]: https://github.com/octo/cat/commit/abc1234567"
        );
    }

    #[test]
    fn required_preview_failure_aborts() {
        let (_dir, mut settings) = workspace(README);
        settings.preview = PreviewMode::Required;
        let (source, preview, publisher) = collaborators();

        let err = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap_err();

        assert!(matches!(err, RunError::PreviewUnavailable(_)));
        assert!(publisher.published().is_empty());
        assert_eq!(fs::read_to_string(&settings.readme).unwrap(), README);
    }

    #[test]
    fn fallback_preview_failure_uses_plain_line() {
        let (_dir, mut settings) = workspace(README);
        settings.preview = PreviewMode::Fallback;
        let (source, preview, publisher) = collaborators();

        let outcome = Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        assert_eq!(outcome, RunOutcome::Updated(expected_commit()));
        assert_eq!(preview.requests().len(), 1);
        assert_eq!(
            patch::region(&publisher.published()[0].1).unwrap(),
            "Fix widget octo/cat@abc1234567"
        );
    }

    #[test]
    fn enterprise_host_in_commit_url() {
        let (_dir, mut settings) = workspace(README);
        settings.preview = PreviewMode::Fallback;
        settings.host = "git.example.com".into();
        let (source, preview, publisher) = collaborators();

        Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        assert_eq!(
            preview.requests(),
            vec!["https://git.example.com/octo/cat/commit/abc1234567".to_string()]
        );
    }

    #[test]
    fn readme_path_is_passed_to_publisher() {
        let (_dir, settings) = workspace(README);
        let (source, preview, publisher) = collaborators();

        Pipeline::new(&source, &preview, &publisher)
            .run(&settings)
            .unwrap();

        let paths: Vec<PathBuf> = publisher.published().into_iter().map(|p| p.0).collect();
        assert_eq!(paths, vec![settings.readme.clone()]);
    }
}
