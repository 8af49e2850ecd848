//! Synthetic corpora for benchmarking the `docdiff` comparison engine.
//!
//! Each [`Corpus`] generates a deterministic pair of documents sized to
//! exercise a realistic share of the canonicalizer and the line matcher.
//!
//! # Examples
//!
//! ```
//! use docdiff_core::CompareOptions;
//!
//! let corpus = docdiff_benches::available_corpora()
//!     .iter()
//!     .find(|corpus| corpus.name() == "json-records")
//!     .expect("registered corpus");
//! let result = corpus.load().compare(&CompareOptions::default());
//! assert!(!result.equal);
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fmt::Write as _;

use docdiff_core::{
    canonicalize, compare_with_options, CompareOptions, DiffResult, Format, ParseFailure,
};

/// A named generator of document pairs.
#[derive(Clone, Copy, Debug)]
pub struct Corpus {
    name: &'static str,
    format: Format,
    generate: fn() -> (String, String),
}

impl Corpus {
    /// Stable identifier used as the benchmark parameter.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Format of both generated documents.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Generates the document pair.
    #[must_use]
    pub fn load(&self) -> Dataset {
        let (before, after) = (self.generate)();
        Dataset { format: self.format, before, after }
    }

    /// Combined size of both documents in bytes.
    #[must_use]
    pub fn fixture_bytes(&self) -> usize {
        let dataset = self.load();
        dataset.before.len() + dataset.after.len()
    }
}

/// A generated document pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    format: Format,
    before: String,
    after: String,
}

impl Dataset {
    /// The left document.
    #[must_use]
    pub fn before(&self) -> &str {
        &self.before
    }

    /// The right document.
    #[must_use]
    pub fn after(&self) -> &str {
        &self.after
    }

    /// Canonical forms of both documents.
    pub fn canonicalize(&self) -> Result<(String, String), ParseFailure> {
        Ok((canonicalize(&self.before, self.format)?, canonicalize(&self.after, self.format)?))
    }

    /// Runs the full comparison.
    #[must_use]
    pub fn compare(&self, options: &CompareOptions) -> DiffResult {
        compare_with_options(&self.before, &self.after, self.format, options)
    }
}

const CORPORA: &[Corpus] = &[
    Corpus { name: "json-records", format: Format::Json, generate: json_records },
    Corpus { name: "json-config", format: Format::Json, generate: json_config },
    Corpus { name: "xml-catalog", format: Format::Xml, generate: xml_catalog },
    Corpus { name: "xml-reformatted", format: Format::Xml, generate: xml_reformatted },
];

/// Returns every registered corpus.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    CORPORA
}

/// An array of records where every 50th record changes and a few are inserted.
fn json_records() -> (String, String) {
    let record = |id: usize, status: &str| {
        format!(
            r#"{{"id":{id},"name":"user-{id}","status":"{status}","tags":["a","b"],"score":{}}}"#,
            id * 7 % 101
        )
    };
    let before: Vec<String> = (0..500).map(|id| record(id, "active")).collect();
    let mut after = Vec::with_capacity(510);
    for id in 0..500 {
        if id % 50 == 0 {
            after.push(record(id, "suspended"));
        } else {
            after.push(record(id, "active"));
        }
        if id % 125 == 0 {
            after.push(record(1000 + id, "new"));
        }
    }
    (format!("[{}]", before.join(",")), format!("[{}]", after.join(",")))
}

/// A flat settings object whose keys arrive in opposite orders.
fn json_config() -> (String, String) {
    let entry = |key: usize, value: usize| format!(r#""setting_{key:04}":{value}"#);
    let before: Vec<String> = (0..1_000).map(|key| entry(key, key)).collect();
    let after: Vec<String> =
        (0..1_000).rev().map(|key| entry(key, if key == 500 { 0 } else { key })).collect();
    (format!("{{{}}}", before.join(",")), format!("{{{}}}", after.join(",")))
}

/// A book catalog with edited prices and a removed entry.
fn xml_catalog() -> (String, String) {
    let book = |out: &mut String, id: usize, price: usize| {
        let _ = write!(out, r#"<book id="bk{id}"><title>Volume {id}</title>"#);
        let _ = write!(out, r#"<price currency="EUR">{price}</price></book>"#);
    };
    let mut before = String::from("<catalog>");
    let mut after = String::from("<catalog>");
    for id in 0..400 {
        book(&mut before, id, 10 + id % 30);
        if id == 200 {
            continue;
        }
        book(&mut after, id, if id % 40 == 0 { 99 } else { 10 + id % 30 });
    }
    before.push_str("</catalog>");
    after.push_str("</catalog>");
    (before, after)
}

/// Identical content written compactly and pretty-printed.
fn xml_reformatted() -> (String, String) {
    let mut compact = String::from("<?xml version=\"1.0\"?><items>");
    let mut pretty = String::from("<items>\n");
    for id in 0..1_000 {
        let _ = write!(compact, "<item n=\"{id}\"><v>{}</v></item>", id * 3);
        let _ = write!(pretty, "    <item n='{id}'>\n        <v>{}</v>\n    </item>\n", id * 3);
    }
    compact.push_str("</items>");
    pretty.push_str("</items>\n");
    (compact, pretty)
}
