//! Publishing: write the patched document and push it with git.
//!
//! Only called once a patch actually changed the document. Each step runs
//! a real `git` command in the current directory; the first failure stops
//! the sequence.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use crate::model::CommitRecord;

/// Errors that can occur while publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run git: {0}")]
    Spawn(#[source] io::Error),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

/// Persists a patched document and propagates it.
pub trait Publisher {
    /// Write `contents` to `path` and record the change for `commit`.
    fn publish(&self, path: &Path, contents: &str, commit: &CommitRecord)
    -> Result<(), PublishError>;
}

/// Name and email recorded on the generated commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Publisher that stages, commits and pushes with the `git` binary.
pub struct GitPublisher {
    author: Option<Author>,
    push: bool,
}

impl GitPublisher {
    /// `author` overrides git's configured identity; `push` controls
    /// whether the commit leaves the local repository.
    pub fn new(author: Option<Author>, push: bool) -> Self {
        Self { author, push }
    }

    /// Arguments for `git commit`, including any author override.
    fn commit_args(&self, commit: &CommitRecord) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(author) = &self.author {
            args.extend([
                "-c".to_string(),
                format!("user.name={}", author.name),
                "-c".to_string(),
                format!("user.email={}", author.email),
            ]);
        }
        args.extend([
            "commit".to_string(),
            "-m".to_string(),
            commit_message(commit),
        ]);
        args
    }
}

impl Publisher for GitPublisher {
    fn publish(
        &self,
        path: &Path,
        contents: &str,
        commit: &CommitRecord,
    ) -> Result<(), PublishError> {
        fs::write(path, contents).map_err(|source| PublishError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote document");

        let path_arg = path.to_string_lossy();
        run_git(&["add", "--", &path_arg])?;

        let commit_args = self.commit_args(commit);
        run_git(&commit_args.iter().map(String::as_str).collect::<Vec<_>>())?;
        tracing::info!("Committed {}", commit_message(commit));

        if self.push {
            run_git(&["push"])?;
            tracing::info!("Pushed to remote");
        } else {
            tracing::info!("Push disabled; commit left local");
        }

        Ok(())
    }
}

/// Message for the commit that records the document change.
pub fn commit_message(commit: &CommitRecord) -> String {
    format!("Update latest commit: {}@{}", commit.repo_name, commit.sha)
}

/// Run a git command, failing with its stderr on a non-zero exit.
fn run_git(args: &[&str]) -> Result<(), PublishError> {
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(PublishError::Spawn)?;

    if !output.status.success() {
        return Err(PublishError::Git {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
