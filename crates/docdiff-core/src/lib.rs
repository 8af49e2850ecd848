//! Structural comparison of JSON and XML documents.
//!
//! Both documents are first reduced to a canonical text, so that formatting
//! and JSON key order never count as differences. The canonical texts are
//! then split into lines, matched with Myers' shortest-edit-script search and
//! classified row by row for side-by-side display.
//!
//! ```
//! use docdiff_core::{compare, Format, LineKind};
//!
//! let left = r#"{"name":"docdiff","version":1}"#;
//! let right = r#"{ "version": 2, "name": "docdiff" }"#;
//! let result = compare(left, right, Format::Json);
//!
//! assert!(!result.equal);
//! assert_eq!(result.stats.changed, 1);
//! let changed = result.lines.iter().find(|line| line.kind == LineKind::Changed).unwrap();
//! assert_eq!(changed.left, "  \"version\": 1");
//! assert_eq!(changed.right, "  \"version\": 2");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod canonical;
mod compare;
pub mod diff;
mod error;
mod format;
mod options;

pub use canonical::{canonicalize, canonicalize_with_options};
pub use compare::{compare, compare_with_options, try_compare, Comparison, DiffResult};
pub use diff::{DiffLine, DiffStats, LineKind};
pub use error::{
    CanonicalizeError, CompareError, LimitExceeded, Measure, OptionsError, ParseFailure, Side,
    UnorderedPairs, UnsupportedFormat,
};
pub use format::Format;
pub use options::{
    CompareOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_LINES,
    MAX_SUPPORTED_DEPTH,
};

/// Returns the semantic version of the `docdiff-core` crate.
///
/// ```
/// assert!(!docdiff_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
