use std::fmt;

use thiserror::Error;

use crate::Format;

/// A document could not be canonicalized because its text is malformed.
///
/// `line` and `column` are 1-based and present only when the underlying
/// parser reported a position.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseFailure {
    /// Format the text was parsed as.
    pub format: Format,
    /// Human-readable parser diagnostic.
    pub message: String,
    /// Line of the failure, when known.
    pub line: Option<usize>,
    /// Column of the failure, when known.
    pub column: Option<usize>,
}

impl ParseFailure {
    pub(crate) fn new(format: Format, message: impl Into<String>) -> Self {
        Self { format, message: message.into(), line: None, column: None }
    }

    pub(crate) fn at(mut self, line: usize, column: usize) -> Self {
        self.line = (line > 0).then_some(line);
        self.column = (column > 0).then_some(column);
        self
    }
}

/// A format name other than `json` or `xml` was requested.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported format {found:?} (expected json or xml)")]
pub struct UnsupportedFormat {
    /// The rejected format name, as supplied.
    pub found: String,
}

/// Which of the two compared documents an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The base document.
    Left,
    /// The target document.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// The quantity an input ceiling is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measure {
    /// Raw input size in bytes.
    Bytes,
    /// Canonical line count.
    Lines,
    /// Element or container nesting depth.
    Depth,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Bytes => f.write_str("bytes"),
            Measure::Lines => f.write_str("lines"),
            Measure::Depth => f.write_str("levels of nesting"),
        }
    }
}

/// A document exceeds one of the ceilings in [`CompareOptions`](crate::CompareOptions).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("input has {actual} {measure}, exceeding the limit of {limit}")]
pub struct LimitExceeded {
    /// Unit of `actual` and `limit`.
    pub measure: Measure,
    /// Measured size.
    pub actual: usize,
    /// Configured ceiling.
    pub limit: usize,
}

impl LimitExceeded {
    /// Attributes the breach to one of the compared documents.
    #[must_use]
    pub fn on(self, side: Side) -> CompareError {
        CompareError::InputTooLarge { side, exceeded: self }
    }
}

/// Reasons a single document has no canonical form.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CanonicalizeError {
    /// The text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    /// The text exceeds a configured ceiling.
    #[error(transparent)]
    TooLarge(#[from] LimitExceeded),
}

impl CanonicalizeError {
    /// Attributes the failure to one of the compared documents.
    #[must_use]
    pub fn on(self, side: Side) -> CompareError {
        match self {
            Self::Parse(failure) => CompareError::Parse(failure),
            Self::TooLarge(exceeded) => exceeded.on(side),
        }
    }
}

/// Reasons a comparison produces no diff.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// One or both documents are empty or whitespace only.
    #[error("Both inputs are required")]
    EmptyInput,
    /// One of the documents is malformed.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    /// A document exceeds a configured size ceiling.
    #[error("{side} {exceeded}")]
    InputTooLarge {
        /// The offending document.
        side: Side,
        /// Which ceiling was breached, and by how much.
        exceeded: LimitExceeded,
    },
}

/// Errors emitted when constructing [`CompareOptions`](crate::CompareOptions).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    /// A size ceiling of zero would reject every document.
    #[error("limit on {measure} must be greater than zero")]
    ZeroLimit {
        /// Which ceiling was set to zero.
        measure: Measure,
    },
    /// Nesting deeper than the parsers can walk safely was requested.
    #[error("nesting limit {requested} exceeds the supported maximum of {supported}")]
    DepthUnsupported {
        /// The requested ceiling.
        requested: usize,
        /// The largest accepted ceiling.
        supported: usize,
    },
}

/// An [`EditScript`](crate::diff::EditScript) was built from pairs that do not ascend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("line pair {index} does not ascend past the pair before it")]
pub struct UnorderedPairs {
    /// Position of the first offending pair.
    pub index: usize,
}
