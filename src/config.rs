//! latest-commit configuration.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags (and their environment fallbacks), an optional TOML file, and
//! built-in defaults. The file lives at
//! `<config dir>/latest-commit/config.toml` unless `--config` names another.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{
    preview::{self, PreviewMode},
    publish::Author,
};

pub const DEFAULT_README: &str = "README.md";
pub const DEFAULT_HOST: &str = "github.com";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of the config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    /// GitHub user whose latest push is shown.
    pub username: Option<String>,

    /// Document holding the marker region.
    pub readme: Option<PathBuf>,

    /// Preview policy: `off` (default), `required` or `fallback`.
    pub preview: Option<PreviewMode>,
    pub preview_endpoint: Option<String>,

    /// Web host used in commit links.
    pub host: Option<String>,

    /// Base URL of the REST API serving the event feed.
    pub api_url: Option<String>,

    /// Push the generated commit. Defaults to true.
    pub push: Option<bool>,

    /// Per-request HTTP timeout.
    pub timeout_secs: Option<u64>,

    /// Identity for the generated commit.
    pub author: Option<AuthorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
}

impl FileConfig {
    /// Load the config file.
    ///
    /// An explicitly named file must exist. The default file is optional:
    /// when it is missing, every key takes its default.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The default config file path: `<config dir>/latest-commit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("latest-commit").join("config.toml"))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// May be empty here; the pipeline rejects that before any I/O.
    pub username: String,
    pub readme: PathBuf,
    pub preview: PreviewMode,
    pub preview_endpoint: String,
    pub host: String,
    pub api_url: String,
    pub push: bool,
    pub dry_run: bool,
    pub timeout: Duration,
    pub author: Option<Author>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_file(FileConfig::default())
    }
}

impl Settings {
    /// Settings from the config file alone, defaults filling the gaps.
    pub fn from_file(file: FileConfig) -> Self {
        Self {
            username: file.username.unwrap_or_default(),
            readme: file.readme.unwrap_or_else(|| PathBuf::from(DEFAULT_README)),
            preview: file.preview.unwrap_or_default(),
            preview_endpoint: file
                .preview_endpoint
                .unwrap_or_else(|| preview::DEFAULT_ENDPOINT.to_string()),
            host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            api_url: file.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            push: file.push.unwrap_or(true),
            dry_run: false,
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            author: file.author.map(|a| Author {
                name: a.name,
                email: a.email,
            }),
        }
    }
}
