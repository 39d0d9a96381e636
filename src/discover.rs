//! Finds post source files under the blog directory and computes the
//! identifier and link each one will be published under.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = "md";
const HTML_EXTENSION: &str = ".html";

lazy_static! {
    static ref ILLEGAL_NAME_CHARS: Regex = Regex::new("[^-a-zA-Z0-9_]").expect("valid regex");
}

/// A discovered post source file that hasn't been read yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    /// The sanitized path segments joined with `-`, e.g. `go-web-intro` for
    /// `go/web/intro.md`.
    pub id: String,

    /// The output-relative link, always `{id}.html`.
    pub link: String,

    /// The path of the source file.
    pub path: PathBuf,
}

/// Joins the given names with `-`, replacing every character outside of
/// `[-a-zA-Z0-9_]` with `-`.
pub fn make_name<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| ILLEGAL_NAME_CHARS.replace_all(name.as_ref(), "-"))
        .collect::<Vec<_>>()
        .join("-")
}

/// Recursively searches `root` for markdown files and returns them in
/// file-name order, directories expanded in place. Files in subdirectories
/// get the directory names as a prefix of their identifier.
pub fn list_documents(root: &Path) -> Result<Vec<Source>> {
    let mut sources = Vec::new();
    for result in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = result?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(MARKDOWN_EXTENSION)
        {
            continue;
        }

        // strip_prefix shouldn't fail since `root` is always an ancestor of
        // the entries WalkDir yields.
        let relative = path
            .strip_prefix(root)
            .map_err(|_| Error::InvalidFileName(path.to_owned()))?;
        let mut names = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                names.push(
                    component
                        .as_os_str()
                        .to_str()
                        .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?,
                );
            }
        }
        names.push(
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?,
        );

        let id = make_name(&names);
        tracing::trace!(path = %path.display(), %id, "discovered document");
        sources.push(Source {
            link: format!("{}{}", id, HTML_EXTENSION),
            id,
            path: path.to_owned(),
        });
    }
    Ok(sources)
}

/// The result of a fallible discovery operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem discovering source files.
#[derive(Debug)]
pub enum Error {
    /// Returned for WalkDir I/O errors, including a missing blog directory.
    WalkDir(walkdir::Error),

    /// Returned when a source path isn't valid UTF-8.
    InvalidFileName(PathBuf),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(path) => write!(f, "invalid file name: {:?}", path),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(_) => None,
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking the blog directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
