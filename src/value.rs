//! Converts documents and the materialized indexes into [`Value`]s for
//! templating. Keys are snake_case; see the `demo/templates` directory for
//! how templates consume them.

use crate::archive::{Month, Year};
use crate::document::Document;
use crate::tag::Tag;
use gtmpl_value::Value;
use std::collections::HashMap;

pub(crate) fn strings(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
}

pub(crate) fn documents(documents: &[&Document]) -> Value {
    Value::Array(documents.iter().map(|&d| d.into()).collect())
}

impl From<&Document> for Value {
    /// Exposes `id`, `link`, `title`, `author`, `description`, `tags`,
    /// `languages`, `cdate`, `udate`, `pub_date` and `content`.
    fn from(d: &Document) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("id".to_owned(), Value::String(d.id().to_owned()));
        m.insert("link".to_owned(), Value::String(d.link().to_owned()));
        m.insert("title".to_owned(), Value::String(d.title().to_owned()));
        m.insert("author".to_owned(), Value::String(d.author().to_owned()));
        m.insert(
            "description".to_owned(),
            Value::String(d.description().to_owned()),
        );
        m.insert("tags".to_owned(), strings(d.tags()));
        m.insert("languages".to_owned(), strings(d.languages()));
        m.insert("cdate".to_owned(), Value::String(d.created_date()));
        m.insert("udate".to_owned(), Value::String(d.updated_date()));
        m.insert("pub_date".to_owned(), Value::String(d.pub_date()));
        m.insert("content".to_owned(), Value::String(d.content().to_owned()));
        Value::Object(m)
    }
}

impl From<&Month<'_>> for Value {
    fn from(month: &Month) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("month".to_owned(), Value::String(month.month.clone()));
        m.insert("entries".to_owned(), documents(&month.documents));
        Value::Object(m)
    }
}

impl From<&Year<'_>> for Value {
    fn from(year: &Year) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("year".to_owned(), Value::String(year.year.clone()));
        m.insert(
            "months".to_owned(),
            Value::Array(year.months.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

impl From<&Tag<'_>> for Value {
    fn from(tag: &Tag) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(tag.name.clone()));
        m.insert("anchor".to_owned(), Value::String(tag.anchor()));
        m.insert("entries".to_owned(), documents(&tag.documents));
        Value::Object(m)
    }
}
