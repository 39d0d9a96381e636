//! Defines the [`Document`] type, the in-memory representation of a single
//! post, and [`load`], which reads a discovered [`Source`] from disk and
//! turns it into a [`Document`].

use crate::discover::Source;
use crate::history::{self, Timestamps};
use crate::markdown;
use crate::metadata::{self, Metadata};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single post. A [`Document`] is built once by [`load`] (or
/// [`Document::new`]) and never mutated afterward; the date and tag indexes
/// only ever borrow it.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    id: String,
    link: String,
    title: String,
    author: String,
    description: String,
    tags: Vec<String>,
    languages: Vec<String>,
    created: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
    content: String,
}

impl Document {
    /// Assembles a document from the pieces produced by discovery, metadata
    /// extraction, timestamp resolution and markdown rendering. No validation
    /// is performed; empty strings and lists are fine.
    pub fn new(
        source: Source,
        metadata: Metadata,
        timestamps: Timestamps,
        content: String,
    ) -> Document {
        Document {
            id: source.id,
            link: source.link,
            title: metadata.title,
            author: metadata.author,
            description: metadata.description,
            tags: metadata.tags,
            languages: metadata.languages,
            created: timestamps.created,
            updated: timestamps.updated,
            content,
        }
    }

    /// The identifier derived from the source path, e.g. `rust-hello` for
    /// `rust/hello.md`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The output-relative link, i.e. the identifier plus `.html`.
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    /// The rendered HTML body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The creation date as `YYYY-MM-DD`, or an empty string if the creation
    /// time is unknown.
    pub fn created_date(&self) -> String {
        match self.created {
            Some(created) => created.format(DATE_FORMAT).to_string(),
            None => String::new(),
        }
    }

    /// The update date as `YYYY-MM-DD`. Empty if the update time is unknown
    /// or identical to the creation time, so templates don't show a
    /// redundant "updated" marker.
    pub fn updated_date(&self) -> String {
        match self.updated {
            Some(updated) if self.created != Some(updated) => {
                updated.format(DATE_FORMAT).to_string()
            }
            _ => String::new(),
        }
    }

    /// The creation time in RFC 2822 form for the feed's `<pubDate>`, or an
    /// empty string if it is unknown.
    pub fn pub_date(&self) -> String {
        match self.created {
            Some(created) => created.to_rfc2822(),
            None => String::new(),
        }
    }
}

/// Reads the source file, extracts its annotations, resolves its timestamps
/// and renders its markdown body.
pub fn load(source: Source) -> Result<Document> {
    let contents = std::fs::read_to_string(&source.path).map_err(|err| Error::Read {
        path: source.path.clone(),
        err,
    })?;
    let metadata = metadata::extract(&contents);
    let timestamps = history::lookup(&source.path);
    let content = markdown::to_html(&contents);
    tracing::debug!(
        id = %source.id,
        path = %source.path.display(),
        tags = metadata.tags.len(),
        dated = timestamps.created.is_some(),
        "loaded document"
    );
    Ok(Document::new(source, metadata, timestamps, content))
}

/// Loads every [`Source`], stopping at the first failure.
pub fn load_all(sources: Vec<Source>) -> Result<Vec<Document>> {
    sources.into_iter().map(load).collect()
}

/// The result of a fallible document-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file can't be read.
    Read { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "Reading document '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture(id: &str, created: Option<DateTime<Utc>>, tags: &[&str]) -> Document {
    Document::new(
        Source {
            id: id.to_owned(),
            link: format!("{}.html", id),
            path: PathBuf::from(format!("{}.md", id)),
        },
        Metadata {
            title: id.to_owned(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Metadata::default()
        },
        Timestamps {
            created,
            updated: created,
        },
        String::new(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_dates_empty_when_unset() {
        let doc = fixture("undated", None, &[]);
        assert_eq!("", doc.created_date());
        assert_eq!("", doc.updated_date());
        assert_eq!("", doc.pub_date());
    }

    #[test]
    fn test_updated_date_hidden_when_equal_to_created() {
        let created = Utc.with_ymd_and_hms(2013, 4, 2, 10, 0, 0).unwrap();
        let doc = fixture("same", Some(created), &[]);
        assert_eq!("2013-04-02", doc.created_date());
        assert_eq!("", doc.updated_date());
    }

    #[test]
    fn test_updated_date_shown_when_different() {
        let created = Utc.with_ymd_and_hms(2013, 4, 2, 10, 0, 0).unwrap();
        let doc = Document::new(
            Source {
                id: "edited".to_owned(),
                link: "edited.html".to_owned(),
                path: PathBuf::from("edited.md"),
            },
            Metadata::default(),
            Timestamps {
                created: Some(created),
                updated: Some(Utc.with_ymd_and_hms(2013, 5, 9, 8, 30, 0).unwrap()),
            },
            String::new(),
        );
        assert_eq!("2013-05-09", doc.updated_date());
    }

    #[test]
    fn test_updated_date_without_created() {
        let doc = Document::new(
            Source {
                id: "half".to_owned(),
                link: "half.html".to_owned(),
                path: PathBuf::from("half.md"),
            },
            Metadata::default(),
            Timestamps {
                created: None,
                updated: Some(Utc.with_ymd_and_hms(2020, 1, 31, 0, 0, 0).unwrap()),
            },
            String::new(),
        );
        assert_eq!("", doc.created_date());
        assert_eq!("2020-01-31", doc.updated_date());
    }

    #[test]
    fn test_pub_date() {
        let created = Utc.with_ymd_and_hms(2013, 4, 2, 10, 5, 0).unwrap();
        let doc = fixture("feed", Some(created), &[]);
        assert_eq!("Tue, 02 Apr 2013 10:05:00 +0000", doc.pub_date());
    }

    #[test]
    fn test_load() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hello.md");
        std::fs::write(
            &path,
            "<!-- Title: Hello -->\n<!-- Tags: rust, web -->\n# Heading\n",
        )?;
        let doc = load(Source {
            id: "hello".to_owned(),
            link: "hello.html".to_owned(),
            path,
        })?;
        assert_eq!("Hello", doc.title());
        assert_eq!(&["rust".to_owned(), "web".to_owned()], doc.tags());
        assert!(doc.content().contains("<h1>Heading</h1>"));
        assert!(doc.created().is_some());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Source {
            id: "missing".to_owned(),
            link: "missing.html".to_owned(),
            path: PathBuf::from("/nonexistent/missing.md"),
        });
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
