use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::diff::{classify, compute_matching, DiffLine, DiffStats, LineKind};
use crate::{canonicalize_with_options, CompareError, CompareOptions, Format, Measure, Side};

/// A successful comparison: both canonical forms and the classified rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    /// Canonical form of the left document.
    pub left_normalized: String,
    /// Canonical form of the right document.
    pub right_normalized: String,
    /// One row per line, in output order.
    pub lines: Vec<DiffLine>,
    /// Counts of differing rows.
    pub stats: DiffStats,
}

impl Comparison {
    /// Indicates whether the documents are equivalent.
    #[must_use]
    pub fn is_equal(&self) -> bool {
        self.left_normalized == self.right_normalized
    }
}

/// Everything a caller needs to present a comparison, errors included.
///
/// When `error` is set, `lines` is empty, `stats` is zero and both
/// normalized texts are absent. Serializes with camelCase field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Whether both documents share the same canonical form.
    pub equal: bool,
    /// Why no diff was produced.
    pub error: Option<String>,
    /// Line of a parse failure, when the parser reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_line: Option<usize>,
    /// Column of a parse failure, when the parser reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_column: Option<usize>,
    /// Counts of differing rows.
    pub stats: DiffStats,
    /// Classified rows.
    pub lines: Vec<DiffLine>,
    /// Canonical form of the left document.
    pub left_normalized: Option<String>,
    /// Canonical form of the right document.
    pub right_normalized: Option<String>,
}

impl DiffResult {
    fn failed(err: &CompareError) -> Self {
        let (error_line, error_column) = match err {
            CompareError::Parse(failure) => (failure.line, failure.column),
            _ => (None, None),
        };
        Self {
            equal: false,
            error: Some(err.to_string()),
            error_line,
            error_column,
            stats: DiffStats::default(),
            lines: Vec::new(),
            left_normalized: None,
            right_normalized: None,
        }
    }

    /// Number of unchanged rows.
    #[must_use]
    pub fn same_count(&self) -> usize {
        self.lines.iter().filter(|line| line.kind == LineKind::Same).count()
    }
}

impl From<Result<Comparison, CompareError>> for DiffResult {
    fn from(outcome: Result<Comparison, CompareError>) -> Self {
        match outcome {
            Ok(comparison) => Self {
                equal: comparison.is_equal(),
                error: None,
                error_line: None,
                error_column: None,
                stats: comparison.stats,
                lines: comparison.lines,
                left_normalized: Some(comparison.left_normalized),
                right_normalized: Some(comparison.right_normalized),
            },
            Err(err) => Self::failed(&err),
        }
    }
}

/// Compares two documents with the default [`CompareOptions`].
///
/// ```
/// # use docdiff_core::{compare, Format};
/// let result = compare("{\"a\":1,\"b\":[1,2]}", "{\"b\":[1,2],\"a\":1}", Format::Json);
/// assert!(result.equal);
/// assert!(result.stats.is_empty());
///
/// let result = compare("", "{\"a\":1}", Format::Json);
/// assert_eq!(result.error.as_deref(), Some("Both inputs are required"));
/// ```
#[must_use]
pub fn compare(left: &str, right: &str, format: Format) -> DiffResult {
    compare_with_options(left, right, format, &CompareOptions::default())
}

/// Compares two documents, reporting every failure inside the result.
#[must_use]
pub fn compare_with_options(
    left: &str,
    right: &str,
    format: Format,
    options: &CompareOptions,
) -> DiffResult {
    DiffResult::from(try_compare(left, right, format, options))
}

/// Compares two documents, returning failures as a typed error.
///
/// Blank input is rejected before anything is parsed. The left document is
/// canonicalized first, so its failure wins when both are malformed.
///
/// ```
/// # use docdiff_core::{try_compare, CompareError, CompareOptions, Format};
/// let options = CompareOptions::default();
/// let err = try_compare("<a>", "<a/>", Format::Xml, &options).unwrap_err();
/// assert!(matches!(err, CompareError::Parse(_)));
///
/// let ok = try_compare("<a><b/></a>", "<a><c/></a>", Format::Xml, &options)?;
/// assert!(!ok.is_equal());
/// assert_eq!(ok.stats.changed, 1);
/// # Ok::<(), CompareError>(())
/// ```
#[instrument(
    name = "docdiff::compare",
    level = "debug",
    skip_all,
    fields(format = %format, left_bytes = left.len(), right_bytes = right.len())
)]
pub fn try_compare(
    left: &str,
    right: &str,
    format: Format,
    options: &CompareOptions,
) -> Result<Comparison, CompareError> {
    if left.trim().is_empty() || right.trim().is_empty() {
        return Err(CompareError::EmptyInput);
    }
    options.check(Measure::Bytes, left.len()).map_err(|e| e.on(Side::Left))?;
    options.check(Measure::Bytes, right.len()).map_err(|e| e.on(Side::Right))?;

    let left_normalized =
        canonicalize_with_options(left, format, options).map_err(|e| e.on(Side::Left))?;
    let right_normalized =
        canonicalize_with_options(right, format, options).map_err(|e| e.on(Side::Right))?;

    let (lines, stats) = {
        let left_lines: Vec<&str> = left_normalized.split('\n').collect();
        let right_lines: Vec<&str> = right_normalized.split('\n').collect();
        options.check(Measure::Lines, left_lines.len()).map_err(|e| e.on(Side::Left))?;
        options.check(Measure::Lines, right_lines.len()).map_err(|e| e.on(Side::Right))?;

        let matching = compute_matching(&left_lines, &right_lines);
        let (lines, stats) = classify(&left_lines, &right_lines, &matching);
        debug!(
            left_lines = left_lines.len(),
            right_lines = right_lines.len(),
            matched = matching.len(),
            added = stats.added,
            removed = stats.removed,
            changed = stats.changed,
            "documents compared"
        );
        (lines, stats)
    };

    Ok(Comparison { left_normalized, right_normalized, lines, stats })
}
