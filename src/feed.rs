//! Support for creating an RSS 2.0 feed from a list of documents. The
//! `<channel>` header (title, link, description, ...) comes verbatim from
//! `channel.rss` in the template directory; the `<item>`s are generated.

use crate::document::Document;
use chrono::{DateTime, Utc};
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use lazy_static::lazy_static;
use pulldown_cmark::escape::escape_html;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use url::Url;

/// The channel file name inside the template directory.
pub const CHANNEL_FILE: &str = "channel.rss";

const FEED_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">
  <channel>
    <lastBuildDate>{{.build_date}}</lastBuildDate>
{{.channel}}
{{range .items}}    <item>
      <title>{{.title}}</title>
      <link>{{.link}}</link>
      <description>{{.description}}</description>
      <pubDate>{{.pub_date}}</pubDate>
{{range .categories}}      <category>{{.}}</category>
{{end}}    </item>
{{end}}  </channel>
</rss>
"#;

lazy_static! {
    static ref CHANNEL_LINK: Regex = Regex::new("<link>([^<]*)</link>").expect("valid regex");
}

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    /// The raw contents of `channel.rss`, inserted as-is.
    pub channel: String,

    /// The site URL item links are resolved against. Falls back to the
    /// channel's own `<link>` when unset.
    pub site_url: Option<Url>,

    /// Rendered as `<lastBuildDate>`.
    pub build_time: DateTime<Utc>,
}

impl FeedConfig {
    /// Reads `channel.rss` from `template_directory`.
    pub fn load(
        template_directory: &Path,
        site_url: Option<Url>,
        build_time: DateTime<Utc>,
    ) -> Result<FeedConfig> {
        Ok(FeedConfig {
            channel: std::fs::read_to_string(template_directory.join(CHANNEL_FILE))?,
            site_url,
            build_time,
        })
    }

    /// The URL item links are joined onto, with a trailing slash so that the
    /// last path segment isn't dropped by [`Url::join`].
    fn base_url(&self) -> Result<Option<Url>> {
        let url = match &self.site_url {
            Some(url) => url.clone(),
            None => match CHANNEL_LINK.captures(&self.channel) {
                Some(captures) => Url::parse(captures[1].trim())?,
                None => return Ok(None),
            },
        };
        Ok(Some(with_trailing_slash(url)))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Creates a feed from a [`FeedConfig`] and a list of [`Document`]s and
/// writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(
    config: &FeedConfig,
    documents: &[&Document],
    mut w: W,
) -> Result<()> {
    let mut template = Template::default();
    template.parse(FEED_TEMPLATE).map_err(Error::Template)?;
    let context = Context::from(feed(config, documents)?).map_err(Error::Template)?;
    template.execute(&mut w, &context).map_err(Error::Template)?;
    Ok(())
}

fn feed(config: &FeedConfig, documents: &[&Document]) -> Result<Value> {
    let base = config.base_url()?;
    let mut items = Vec::with_capacity(documents.len());
    for document in documents {
        let link = match &base {
            Some(base) => base.join(document.link())?.to_string(),
            None => document.link().to_owned(),
        };
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(escape(document.title())?));
        m.insert("link".to_owned(), Value::String(escape(&link)?));
        m.insert(
            "description".to_owned(),
            Value::String(escape(document.description())?),
        );
        m.insert("pub_date".to_owned(), Value::String(document.pub_date()));
        m.insert(
            "categories".to_owned(),
            Value::Array(
                document
                    .tags()
                    .iter()
                    .map(|t| escape(t).map(Value::String))
                    .collect::<Result<Vec<Value>>>()?,
            ),
        );
        items.push(Value::Object(m));
    }

    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert(
        "build_date".to_owned(),
        Value::String(config.build_time.to_rfc2822()),
    );
    m.insert("channel".to_owned(), Value::String(config.channel.trim_end().to_owned()));
    m.insert("items".to_owned(), Value::Array(items));
    Ok(Value::Object(m))
}

// Escapes text for use inside an XML element.
fn escape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    escape_html(&mut out, s)?;
    Ok(out)
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error, including a missing
    /// `channel.rss`.
    Io(io::Error),

    /// Returned when the feed template can't be executed.
    Template(String),

    /// Returned when the site URL can't be parsed or joined.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
