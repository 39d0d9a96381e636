//! The library code for the `quire` static blog generator. A build runs in
//! four steps:
//!
//! 1. Discovering post sources in the blog directory ([`crate::discover`])
//! 2. Loading each source into a [`crate::document::Document`]: annotations
//!    ([`crate::metadata`]), timestamps ([`crate::history`]) and the rendered
//!    body ([`crate::markdown`])
//! 3. Grouping the documents by date ([`crate::archive`]) and by tag
//!    ([`crate::tag`])
//! 4. Writing the pages ([`crate::write`]) and the RSS feed ([`crate::feed`])
//!
//! The third step is where the ordering rules live. The archive lists years
//! oldest first but months and entries within a year newest first; the tags
//! page lists tags alphabetically but keeps each tag's entries in discovery
//! order. The home page and the feed take the first N entries of the
//! archive's traversal order, see [`crate::archive::most_recent`].
//!
//! [`crate::build::build_site`] runs all of it from a
//! [`crate::config::Config`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod build;
pub mod config;
pub mod discover;
pub mod document;
pub mod feed;
pub mod history;
pub mod markdown;
pub mod metadata;
pub mod tag;
mod value;
pub mod write;
