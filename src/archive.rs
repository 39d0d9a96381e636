//! The chronological archive. [`DateIndex`] groups documents by the year and
//! month of their creation time; [`DateIndex::sorted`] materializes it into
//! the order the archives page shows; [`most_recent`] picks the entries for
//! the home page and the feed from that materialized view.
//!
//! Ordering of the materialized view:
//!
//! * years ascending by numeric value (oldest first), labels that aren't
//!   numbers first;
//! * months within a year descending by calendar position (December first);
//! * documents within a month descending by creation time (newest first),
//!   equal times keeping their build order.

use crate::document::Document;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Full month names in calendar order.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// What an unset creation time formats to.
const UNDATED_YEAR: &str = "0001";
const UNDATED_MONTH: &str = "January";

/// The documents of one month.
#[derive(Clone, Debug, PartialEq)]
pub struct Month<'a> {
    /// The full month name, e.g. `March`.
    pub month: String,
    pub documents: Vec<&'a Document>,
}

impl Month<'_> {
    /// The 1-based calendar position of the month, or 0 for a name that isn't
    /// a month.
    pub fn number(&self) -> usize {
        month_number(&self.month)
    }
}

/// The months of one year that have documents.
#[derive(Clone, Debug, PartialEq)]
pub struct Year<'a> {
    /// The four-digit year, e.g. `2013`.
    pub year: String,
    pub months: Vec<Month<'a>>,
}

impl<'a> Year<'a> {
    fn add(&mut self, month: &str, document: &'a Document) {
        match self.months.iter_mut().find(|m| m.month == month) {
            Some(m) => m.documents.push(document),
            None => self.months.push(Month {
                month: month.to_owned(),
                documents: vec![document],
            }),
        }
    }

    fn sort(&mut self) {
        self.months.sort_by_key(|m| Reverse(m.number()));
        for month in self.months.iter_mut() {
            month.documents.sort_by_key(|d| Reverse(d.created()));
        }
    }
}

/// Documents grouped by year and month. Built by [`DateIndex::build`] and
/// only meaningful once [`DateIndex::sorted`] has been called.
#[derive(Debug, Default)]
pub struct DateIndex<'a> {
    years: Vec<Year<'a>>,

    // year label -> position in `years`
    positions: HashMap<String, usize>,
}

impl<'a> DateIndex<'a> {
    /// Groups `documents` by the year and month of their creation time.
    /// Undated documents land in the `0001`/`January` bucket.
    pub fn build(documents: &'a [Document]) -> DateIndex<'a> {
        let mut index = DateIndex::default();
        for document in documents {
            let (year, month) = match document.created() {
                Some(created) => (
                    created.format("%Y").to_string(),
                    created.format("%B").to_string(),
                ),
                None => (UNDATED_YEAR.to_owned(), UNDATED_MONTH.to_owned()),
            };
            index.add(&year, &month, document);
        }
        index
    }

    /// Appends `document` to the given year and month, creating either if
    /// needed. It doesn't check that the document was created in that month.
    pub fn add(&mut self, year: &str, month: &str, document: &'a Document) {
        match self.positions.get(year) {
            Some(&i) => self.years[i].add(month, document),
            None => {
                self.positions.insert(year.to_owned(), self.years.len());
                self.years.push(Year {
                    year: year.to_owned(),
                    months: vec![Month {
                        month: month.to_owned(),
                        documents: vec![document],
                    }],
                });
            }
        }
    }

    /// The number of distinct years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Materializes the index: months and documents newest first within each
    /// year, years oldest first.
    pub fn sorted(mut self) -> Vec<Year<'a>> {
        for year in self.years.iter_mut() {
            year.sort();
        }
        self.years.sort_by_key(|y| y.year.parse::<i64>().ok());
        self.years
    }
}

/// The 1-based calendar position of a full month name, or 0 if `name` isn't
/// one.
pub fn month_number(name: &str) -> usize {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Returns up to `max` documents from a materialized index, in traversal
/// order: years as given (oldest first after [`DateIndex::sorted`]), then
/// months, then documents. With more than one year this yields the newest
/// documents of the *oldest* year first, not the overall newest documents.
pub fn most_recent<'a>(years: &[Year<'a>], max: usize) -> Vec<&'a Document> {
    years
        .iter()
        .flat_map(|year| year.months.iter())
        .flat_map(|month| month.documents.iter().copied())
        .take(max)
        .collect()
}
