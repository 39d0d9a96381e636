//! Extracts the `<!-- Key: value -->` annotations embedded in post sources.
//!
//! ```md
//! <!-- Title: Hello, world! -->
//! <!-- Author: Jane Doe -->
//! <!-- Description: A first post -->
//! <!-- Tags: greet, meta -->
//! <!-- Languages: rust -->
//! ```
//!
//! Missing annotations produce empty values.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE: Regex = annotation("Title");
    static ref AUTHOR: Regex = annotation("Author");
    static ref DESCRIPTION: Regex = annotation("Description");
    static ref TAGS: Regex = annotation("Tags");
    static ref LANGUAGES: Regex = annotation("Languages");
}

fn annotation(key: &str) -> Regex {
    Regex::new(&format!("<!--[ ]*{}:(.*)-->", key)).expect("valid regex")
}

/// The annotations of one post.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub tags: Vec<String>,
    pub languages: Vec<String>,
}

/// Reads all known annotations from a post's raw contents.
pub fn extract(contents: &str) -> Metadata {
    Metadata {
        title: single(&TITLE, contents),
        author: single(&AUTHOR, contents),
        description: single(&DESCRIPTION, contents),
        tags: list(&TAGS, contents),
        languages: list(&LANGUAGES, contents),
    }
}

// The trimmed value of the first match, or "" if there is none.
fn single(re: &Regex, contents: &str) -> String {
    re.captures(contents)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .unwrap_or_default()
}

fn list(re: &Regex, contents: &str) -> Vec<String> {
    single(re, contents)
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
