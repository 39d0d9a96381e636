//! Defines [`Config`], the settings for a single build. It is assembled once
//! from the command-line [`Options`] and an optional `quire.yaml` project
//! file in the working directory, then passed by reference to
//! [`crate::build::build_site`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the optional project file in the working directory.
pub const PROJECT_FILE: &str = "quire.yaml";

pub const DEFAULT_INDEX_ENTRIES: usize = 3;
pub const DEFAULT_FEED_ENTRIES: usize = 10;

/// Settings read from `quire.yaml`. Every field is optional and is
/// overridden by the matching command-line flag.
#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    url: Option<Url>,

    #[serde(default)]
    index_entries: Option<usize>,

    #[serde(default)]
    feed_entries: Option<usize>,
}

/// The raw command-line values. Directories may be relative to
/// `working_directory`.
#[derive(Clone, Debug)]
pub struct Options {
    pub working_directory: PathBuf,
    pub output_directory: PathBuf,
    pub empty_output_directory: bool,
    pub template_directory: PathBuf,
    pub blog_directory: PathBuf,
    pub static_directory: PathBuf,
    pub url: Option<String>,
    pub index_entries: Option<usize>,
    pub feed_entries: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            working_directory: PathBuf::from("."),
            output_directory: PathBuf::from("public"),
            empty_output_directory: false,
            template_directory: PathBuf::from("templates"),
            blog_directory: PathBuf::from("blogs"),
            static_directory: PathBuf::from("static"),
            url: None,
            index_entries: None,
            feed_entries: None,
        }
    }
}

/// The resolved settings of a build.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Where the site is written.
    pub output_directory: PathBuf,

    /// Whether to delete `output_directory` before writing.
    pub empty_output_directory: bool,

    /// Holds the page templates and `channel.rss`.
    pub template_directory: PathBuf,

    /// Holds the markdown posts.
    pub blog_directory: PathBuf,

    /// Copied as-is into `output_directory`.
    pub static_directory: PathBuf,

    /// The site URL feed links are resolved against.
    pub site_url: Option<Url>,

    /// The number of entries on the home page.
    pub max_index_entries: usize,

    /// The number of items in the feed.
    pub feed_entries: usize,
}

impl Config {
    /// Resolves `options` against the working directory and the project file
    /// in it, if there is one.
    pub fn from_options(options: Options) -> Result<Config> {
        let working_directory = options.working_directory;
        let project_path = working_directory.join(PROJECT_FILE);
        let project = if project_path.is_file() {
            Config::read_project(&project_path)?
        } else {
            Project::default()
        };

        let site_url = match options.url {
            Some(url) => {
                Some(Url::parse(&url).with_context(|| format!("Parsing URL `{}`", url))?)
            }
            None => project.url,
        };

        let dir = |relative: &Path| working_directory.join(relative);
        Ok(Config {
            output_directory: dir(&options.output_directory),
            empty_output_directory: options.empty_output_directory,
            template_directory: dir(&options.template_directory),
            blog_directory: dir(&options.blog_directory),
            static_directory: dir(&options.static_directory),
            site_url,
            max_index_entries: options
                .index_entries
                .or(project.index_entries)
                .unwrap_or(DEFAULT_INDEX_ENTRIES),
            feed_entries: options
                .feed_entries
                .or(project.feed_entries)
                .unwrap_or(DEFAULT_FEED_ENTRIES),
        })
    }

    fn read_project(path: &Path) -> Result<Project> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("Loading configuration `{}`", path.display()))
    }
}
