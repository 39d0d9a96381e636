//! Defines the [`TagIndex`], which groups documents under each of their
//! tags for the tags page.

use crate::document::Document;
use std::collections::HashMap;

/// A tag and the documents carrying it, in the order they were indexed.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag<'a> {
    pub name: String,
    pub documents: Vec<&'a Document>,
}

impl Tag<'_> {
    /// A slugified form of the name, suitable for a fragment identifier on
    /// the tags page (`tags.html#{anchor}`).
    pub fn anchor(&self) -> String {
        slug::slugify(&self.name)
    }
}

/// Documents grouped by tag. A document with N tags is listed under N tags.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    tags: Vec<Tag<'a>>,

    // tag name -> position in `tags`
    positions: HashMap<String, usize>,
}

impl<'a> TagIndex<'a> {
    /// Indexes every tag of every document.
    pub fn build(documents: &'a [Document]) -> TagIndex<'a> {
        let mut index = TagIndex::default();
        for document in documents {
            index.add(document);
        }
        index
    }

    /// Appends `document` to each of its tags, creating tags as needed.
    pub fn add(&mut self, document: &'a Document) {
        for name in document.tags() {
            match self.positions.get(name) {
                Some(&i) => self.tags[i].documents.push(document),
                None => {
                    self.positions.insert(name.clone(), self.tags.len());
                    self.tags.push(Tag {
                        name: name.clone(),
                        documents: vec![document],
                    });
                }
            }
        }
    }

    /// The number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Materializes the index ordered by tag name. The documents of each tag
    /// are left in indexing order.
    pub fn sorted(mut self) -> Vec<Tag<'a>> {
        self.tags.sort_by(|a, b| a.name.cmp(&b.name));
        self.tags
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::fixture;
    use chrono::{DateTime, TimeZone, Utc};

    fn year(y: i32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap())
    }

    fn names<'a>(tags: &'a [Tag]) -> Vec<&'a str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    fn ids<'a>(tag: &'a Tag) -> Vec<&'a str> {
        tag.documents.iter().map(|d| d.id()).collect()
    }

    #[test]
    fn test_tags_sorted_documents_in_insertion_order() {
        let documents = vec![
            fixture("d1", year(2010), &["a"]),
            fixture("d2", year(2014), &["a"]),
            fixture("d3", None, &["b"]),
            fixture("d4", None, &[]),
            fixture("d5", None, &[]),
        ];
        let tags = TagIndex::build(&documents).sorted();
        assert_eq!(vec!["a", "b"], names(&tags));
        assert_eq!(vec!["d1", "d2"], ids(&tags[0]));
        assert_eq!(vec!["d3"], ids(&tags[1]));
    }

    #[test]
    fn test_documents_not_resorted_by_date() {
        let documents = vec![
            fixture("old", year(2010), &["x"]),
            fixture("new", year(2020), &["x"]),
        ];
        let tags = TagIndex::build(&documents).sorted();
        assert_eq!(vec!["old", "new"], ids(&tags[0]));
    }

    #[test]
    fn test_document_listed_under_each_tag_only() {
        let documents = vec![
            fixture("both", None, &["web", "go"]),
            fixture("other", None, &["rust"]),
        ];
        let tags = TagIndex::build(&documents).sorted();
        assert_eq!(vec!["go", "rust", "web"], names(&tags));
        for tag in &tags {
            let listed = ids(tag).contains(&"both");
            assert_eq!(tag.name == "go" || tag.name == "web", listed, "{}", tag.name);
        }
    }

    #[test]
    fn test_lexical_order_is_bytewise() {
        let documents = vec![fixture("d", None, &["beta", "Zeta", "alpha", "Alpha"])];
        let tags = TagIndex::build(&documents).sorted();
        assert_eq!(vec!["Alpha", "Zeta", "alpha", "beta"], names(&tags));
    }

    #[test]
    fn test_one_node_per_tag() {
        let documents = vec![
            fixture("a", None, &["x", "y"]),
            fixture("b", None, &["y"]),
            fixture("c", None, &["x"]),
        ];
        let index = TagIndex::build(&documents);
        assert_eq!(2, index.len());
        let tags = index.sorted();
        assert_eq!(vec!["a", "c"], ids(&tags[0]));
        assert_eq!(vec!["a", "b"], ids(&tags[1]));
    }

    #[test]
    fn test_sorted_is_idempotent() {
        let documents = vec![
            fixture("a", None, &["m", "c"]),
            fixture("b", None, &["c", "z"]),
        ];
        assert_eq!(
            TagIndex::build(&documents).sorted(),
            TagIndex::build(&documents).sorted()
        );
    }

    #[test]
    fn test_anchor() {
        let tag = Tag {
            name: "Rust Lang".to_owned(),
            documents: Vec::new(),
        };
        assert_eq!("rust-lang", tag.anchor());
    }
}
