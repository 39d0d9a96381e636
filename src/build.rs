//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: discovering and loading the
//! documents ([`crate::discover`], [`crate::document`]), grouping them
//! ([`crate::archive`], [`crate::tag`]), writing the pages
//! ([`crate::write`]), copying the static directory and generating the RSS
//! feed ([`crate::feed`]).

use crate::archive::{self, DateIndex};
use crate::config::Config;
use crate::discover::{self, Error as DiscoverError};
use crate::document::{self, Error as DocumentError};
use crate::feed::{self, FeedConfig};
use crate::tag::TagIndex;
use crate::write::{Error as WriteError, Templates, Writer};
use chrono::Utc;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Builds the site from a [`Config`]. Any I/O or templating failure aborts
/// the build; a feed failure is only logged.
pub fn build_site(config: &Config) -> Result<()> {
    let now = Utc::now();

    // A broken theme fails before anything is written.
    let templates = Templates::load(&config.template_directory)?;

    if config.empty_output_directory {
        tracing::info!(dir = %config.output_directory.display(), "cleaning output directory");
        rmdir(&config.output_directory)?;
    }
    std::fs::create_dir_all(&config.output_directory).map_err(|err| Error::Create {
        path: config.output_directory.clone(),
        err,
    })?;

    copy_dir(&config.static_directory, &config.output_directory)?;

    let sources = discover::list_documents(&config.blog_directory)?;
    tracing::info!(count = sources.len(), "discovered documents");
    let documents = document::load_all(sources)?;

    let writer = Writer {
        templates: &templates,
        output_directory: &config.output_directory,
        build_date: now.format("%Y-%m-%d").to_string(),
    };
    for document in &documents {
        writer.write_entry(document)?;
    }
    writer.write_about()?;

    let tags = TagIndex::build(&documents).sorted();
    writer.write_tags(&tags)?;

    let years = DateIndex::build(&documents).sorted();
    writer.write_archive(&years)?;

    writer.write_index(&archive::most_recent(&years, config.max_index_entries))?;

    let feed_documents = archive::most_recent(&years, config.feed_entries);
    if let Err(err) = write_feed(config, &feed_documents, now) {
        tracing::warn!(error = %err, "generating feed.rss failed, no feed will be available");
    }

    tracing::info!(
        documents = documents.len(),
        tags = tags.len(),
        years = years.len(),
        output = %config.output_directory.display(),
        "site built"
    );
    Ok(())
}

fn write_feed(
    config: &Config,
    documents: &[&document::Document],
    now: chrono::DateTime<Utc>,
) -> feed::Result<()> {
    let feed_config =
        FeedConfig::load(&config.template_directory, config.site_url.clone(), now)?;

    // A failed feed leaves no file behind.
    let mut rss = Vec::new();
    feed::write_feed(&feed_config, documents, &mut rss)?;
    std::fs::write(config.output_directory.join("feed.rss"), rss)?;
    Ok(())
}

/// Recursively copies the contents of `src` into `dst`, creating
/// directories as needed and overwriting existing files. Copied files keep
/// the modification time of their source.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for result in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = result?;
        // strip_prefix shouldn't fail since `src` is always an ancestor of
        // the entries WalkDir yields.
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|err| Error::Create {
                path: target.clone(),
                err,
            })?;
        } else {
            copy_file(entry.path(), &target).map_err(|err| Error::Copy {
                path: entry.path().to_owned(),
                err,
            })?;
        }
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::copy(src, dst)?;
    let modified = std::fs::metadata(src)?.modified()?;
    File::options().write(true).open(dst)?.set_modified(modified)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can occur during discovery,
/// loading, writing, cleaning the output directory, and copying static
/// files.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors while discovering source files.
    Discover(DiscoverError),

    /// Returned for errors loading documents.
    Document(DocumentError),

    /// Returned for errors loading templates or writing pages.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned when an output directory can't be created.
    Create { path: PathBuf, err: std::io::Error },

    /// Returned when a static file can't be copied.
    Copy { path: PathBuf, err: std::io::Error },

    /// Returned for errors walking the static directory.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Discover(err) => err.fmt(f),
            Error::Document(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Create { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Copy { path, err } => {
                write!(f, "Copying static file '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Discover(err) => Some(err),
            Error::Document(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Create { path: _, err } => Some(err),
            Error::Copy { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<DiscoverError> for Error {
    /// Converts [`DiscoverError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: DiscoverError) -> Error {
        Error::Discover(err)
    }
}

impl From<DocumentError> for Error {
    /// Converts [`DocumentError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: DocumentError) -> Error {
        Error::Document(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
