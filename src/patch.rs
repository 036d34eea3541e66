//! Document patching: rewrite the marker-delimited region of a document.
//!
//! The region is everything strictly between the first line reading
//! [`START_MARKER`] and the first line reading [`END_MARKER`] (surrounding
//! whitespace ignored). It is owned by this tool and replaced wholesale;
//! every other line, including the markers themselves, is kept verbatim.
//!
//! ```text
//! # About me
//! <!-- LATESTCOMMIT:START -->
//! Fix the widget crash octo/cat@abc123
//! <!-- LATESTCOMMIT:END -->
//! ```

use std::{
    borrow::Cow,
    fs, io,
    ops::Range,
    path::{Path, PathBuf},
};

/// Line opening the tool-owned region.
pub const START_MARKER: &str = "<!-- LATESTCOMMIT:START -->";

/// Line closing the tool-owned region.
pub const END_MARKER: &str = "<!-- LATESTCOMMIT:END -->";

/// Errors that can occur while reading or patching a document.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("malformed document: {0}")]
    MalformedDocument(Malformation),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What is wrong with a document's markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Malformation {
    #[error("missing start marker {}", START_MARKER)]
    MissingStart,

    #[error("missing end marker {}", END_MARKER)]
    MissingEnd,

    #[error("missing both markers {} and {}", START_MARKER, END_MARKER)]
    MissingBoth,

    #[error("end marker {} appears before start marker {}", END_MARKER, START_MARKER)]
    EndBeforeStart,
}

/// Result of a successful patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The region already held the fragment; nothing to write.
    Unchanged,

    /// The patched document text.
    Changed(String),
}

/// Replace the region of `document` with `fragment`.
///
/// The fragment is inserted as a single unit, so a multi-line fragment
/// ends up as those lines. Adjacent markers make this a pure insertion.
/// Lines are split on `\n` alone; a trailing `\r` stays with its line, and
/// the fragment takes the line ending of the start marker line.
pub fn patch(document: &str, fragment: &str) -> Result<PatchOutcome, PatchError> {
    let mut lines: Vec<&str> = document.split('\n').collect();
    let region = locate_region(&lines).map_err(PatchError::MalformedDocument)?;

    let crlf = lines[region.start - 1].ends_with('\r');
    let fragment = match_line_endings(fragment, crlf);
    lines.splice(region, [&*fragment]);
    let patched = lines.join("\n");

    if patched == document {
        Ok(PatchOutcome::Unchanged)
    } else {
        Ok(PatchOutcome::Changed(patched))
    }
}

/// Current content of the region, one `\n` between lines.
pub fn region(document: &str) -> Result<String, PatchError> {
    let lines: Vec<&str> = document.split('\n').collect();
    let region = locate_region(&lines).map_err(PatchError::MalformedDocument)?;
    Ok(lines[region]
        .iter()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Read a document, telling a missing file apart from other I/O failures.
pub fn read_document(path: &Path) -> Result<String, PatchError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(PatchError::DocumentNotFound(path.to_path_buf()))
        }
        Err(source) => Err(PatchError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Index range of the lines strictly between the markers.
///
/// Each marker is searched for independently; the first occurrence wins.
fn locate_region(lines: &[&str]) -> Result<Range<usize>, Malformation> {
    let find = |marker: &str| lines.iter().position(|line| line.trim() == marker);

    match (find(START_MARKER), find(END_MARKER)) {
        (Some(start), Some(end)) if end < start => Err(Malformation::EndBeforeStart),
        (Some(start), Some(end)) => Ok(start + 1..end),
        (None, Some(_)) => Err(Malformation::MissingStart),
        (Some(_), None) => Err(Malformation::MissingEnd),
        (None, None) => Err(Malformation::MissingBoth),
    }
}

/// End every fragment line with `\r` when the region uses CRLF.
fn match_line_endings(fragment: &str, crlf: bool) -> Cow<'_, str> {
    if crlf {
        let lines: Vec<String> = fragment
            .split('\n')
            .map(|line| format!("{}\r", line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        Cow::Owned(lines.join("\n"))
    } else {
        Cow::Borrowed(fragment)
    }
}
