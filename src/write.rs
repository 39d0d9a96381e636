//! Loads the site templates and writes the HTML pages: one page per
//! [`Document`], plus the index, archives, tags and about pages.
//!
//! Every page is rendered in two passes. The page's own template (e.g.
//! `entry.html`) produces the inner HTML, which is then handed to
//! `site.html` as `content` together with the page title and navigation
//! flags.

use crate::archive::Year;
use crate::document::Document;
use crate::tag::Tag;
use crate::value;
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The parsed site templates. All of them must exist in the template
/// directory.
pub struct Templates {
    /// `about.html`; receives `cdate`.
    about: Template,

    /// `archive.html`; receives `years` and `cdate`.
    archive: Template,

    /// `entries.html`; receives `entries`, each with its `content`.
    entries: Template,

    /// `entry.html`; receives a single document.
    entry: Template,

    /// `site.html`; wraps every other page.
    site: Template,

    /// `tags.html`; receives `tags` and `cdate`.
    tags: Template,
}

impl Templates {
    /// Reads and parses `{name}.html` for every template from `dir`.
    pub fn load(dir: &Path) -> Result<Templates> {
        Ok(Templates {
            about: parse_template(&dir.join("about.html"))?,
            archive: parse_template(&dir.join("archive.html"))?,
            entries: parse_template(&dir.join("entries.html"))?,
            entry: parse_template(&dir.join("entry.html"))?,
            site: parse_template(&dir.join("site.html"))?,
            tags: parse_template(&dir.join("tags.html"))?,
        })
    }
}

fn parse_template(path: &Path) -> Result<Template> {
    let contents = std::fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
        path: path.to_owned(),
        err,
    })?;
    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate {
            path: path.to_owned(),
            err,
        })?;
    Ok(template)
}

/// Which navigation entry of `site.html` is active.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Section {
    Entry,
    Home,
    Tags,
    Archives,
    About,
}

/// The values `site.html` receives.
struct SiteData<'a> {
    title: &'a str,
    description: &'a str,
    author: &'a str,
    content: String,
    languages: Vec<String>,
    section: Section,
}

impl From<SiteData<'_>> for Value {
    fn from(sd: SiteData) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(sd.title.to_owned()));
        m.insert(
            "description".to_owned(),
            Value::String(sd.description.to_owned()),
        );
        m.insert("author".to_owned(), Value::String(sd.author.to_owned()));
        m.insert("content".to_owned(), Value::String(sd.content));
        m.insert("languages".to_owned(), value::strings(&sd.languages));
        m.insert("at_home".to_owned(), Value::Bool(sd.section == Section::Home));
        m.insert("at_tags".to_owned(), Value::Bool(sd.section == Section::Tags));
        m.insert(
            "at_archives".to_owned(),
            Value::Bool(sd.section == Section::Archives),
        );
        m.insert("at_about".to_owned(), Value::Bool(sd.section == Section::About));
        Value::Object(m)
    }
}

/// Responsible for templating and writing HTML pages to disk.
pub struct Writer<'a> {
    /// The parsed site templates.
    pub templates: &'a Templates,

    /// The directory in which every page is written.
    pub output_directory: &'a Path,

    /// The build date (`YYYY-MM-DD`), passed to the about, archive and tags
    /// templates as `cdate`.
    pub build_date: String,
}

impl Writer<'_> {
    /// Writes `{output_directory}/{link}` for a single document.
    pub fn write_entry(&self, document: &Document) -> Result<()> {
        let content = render(&self.templates.entry, document.into())?;
        self.write_page(
            document.link(),
            SiteData {
                title: document.title(),
                description: document.description(),
                author: document.author(),
                content,
                languages: document.languages().to_vec(),
                section: Section::Entry,
            },
        )
    }

    /// Writes `about.html`.
    pub fn write_about(&self) -> Result<()> {
        let content = render(&self.templates.about, self.dated(HashMap::new()))?;
        self.write_page("about.html", self.section_page("About", content, Section::About))
    }

    /// Writes `tags.html` from a materialized tag index.
    pub fn write_tags(&self, tags: &[Tag]) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "tags".to_owned(),
            Value::Array(tags.iter().map(Value::from).collect()),
        );
        let content = render(&self.templates.tags, self.dated(m))?;
        self.write_page("tags.html", self.section_page("Tags", content, Section::Tags))
    }

    /// Writes `archives.html` from a materialized date index.
    pub fn write_archive(&self, years: &[Year]) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "years".to_owned(),
            Value::Array(years.iter().map(Value::from).collect()),
        );
        let content = render(&self.templates.archive, self.dated(m))?;
        self.write_page(
            "archives.html",
            self.section_page("Archives", content, Section::Archives),
        )
    }

    /// Writes `index.html` listing `documents` with their full content. The
    /// page's languages are the union of the documents' languages.
    pub fn write_index(&self, documents: &[&Document]) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("entries".to_owned(), value::documents(documents));
        let content = render(&self.templates.entries, Value::Object(m))?;

        let mut sd = self.section_page("Index", content, Section::Home);
        sd.languages = languages(documents);
        self.write_page("index.html", sd)
    }

    fn section_page<'s>(
        &self,
        title: &'s str,
        content: String,
        section: Section,
    ) -> SiteData<'s> {
        SiteData {
            title,
            description: "",
            author: "",
            content,
            languages: Vec::new(),
            section,
        }
    }

    fn dated(&self, mut m: HashMap<String, Value>) -> Value {
        m.insert("cdate".to_owned(), Value::String(self.build_date.clone()));
        Value::Object(m)
    }

    /// Wraps the page in `site.html` and writes it to
    /// `{output_directory}/{file_name}`.
    fn write_page(&self, file_name: &str, sd: SiteData) -> Result<()> {
        let path = self.output_directory.join(file_name);
        let mut file = std::fs::File::create(&path).map_err(|err| Error::Create {
            path: path.clone(),
            err,
        })?;
        let context = Context::from(Value::from(sd)).map_err(Error::Template)?;
        self.templates
            .site
            .execute(&mut file, &context)
            .map_err(|err| Error::Annotated(format!("writing `{}`", path.display()), err))?;
        tracing::debug!(path = %path.display(), "wrote page");
        Ok(())
    }
}

/// Executes `template` against `value` and returns the output.
fn render(template: &Template, value: Value) -> Result<String> {
    let context = Context::from(value).map_err(Error::Template)?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context)?;
    String::from_utf8(out).map_err(|err| Error::Template(err.to_string()))
}

/// De-duplicates the documents' languages, keeping first-seen order.
fn languages(documents: &[&Document]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for language in documents.iter().flat_map(|d| d.languages()) {
        if !languages.contains(language) {
            languages.push(language.clone());
        }
    }
    languages
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// Returned for errors during templating.
    Template(String),

    /// Returned when an output file can't be created.
    Create { path: PathBuf, err: io::Error },

    /// A templating error with an annotation.
    Annotated(String, String),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Template(err) => err.fmt(f),
            Error::Create { path, err } => {
                write!(f, "Creating '{}': {}", path.display(), err)
            }
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Template(_) => None,
            Error::Create { path: _, err } => Some(err),
            Error::Annotated(_, _) => None,
        }
    }
}
