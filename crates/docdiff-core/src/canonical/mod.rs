//! Canonical textual forms for JSON and XML documents.
//!
//! Two documents are equivalent exactly when their canonical forms are
//! byte-identical. JSON objects are rewritten with sorted keys and printed
//! with two-space indentation; XML trees are re-serialized, stripped of
//! whitespace between tags and re-indented one element per line.

mod depth;
mod json;
mod xml;

use tracing::{debug, trace};

use crate::{CanonicalizeError, CompareOptions, Format, Measure, ParseFailure};

/// Produces the canonical form of `text` interpreted as `format`.
///
/// Malformed input is reported as a [`ParseFailure`]; nothing is ever
/// partially canonicalized. Documents nested deeper than
/// [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH) are refused the same way.
///
/// ```
/// # use docdiff_core::{canonicalize, Format};
/// let a = canonicalize("{\"b\":2,\"a\":1}", Format::Json)?;
/// let b = canonicalize("{ \"a\": 1, \"b\": 2 }", Format::Json)?;
/// assert_eq!(a, b);
/// assert_eq!(a, "{\n  \"a\": 1,\n  \"b\": 2\n}");
///
/// let xml = canonicalize("<a><b/></a>", Format::Xml)?;
/// assert_eq!(xml, "<a>\n  <b/>\n</a>");
/// # Ok::<(), docdiff_core::ParseFailure>(())
/// ```
pub fn canonicalize(text: &str, format: Format) -> Result<String, ParseFailure> {
    let depth = depth::nesting_depth(text, format);
    if let Err(exceeded) = CompareOptions::default().check(Measure::Depth, depth) {
        return Err(ParseFailure::new(format, exceeded.to_string()));
    }
    canonicalize_unchecked(text, format)
}

/// Produces the canonical form of `text`, applying the byte and nesting
/// ceilings in `options` before the text is parsed.
///
/// ```
/// # use docdiff_core::{canonicalize_with_options, CanonicalizeError, CompareOptions, Format};
/// let options = CompareOptions::default().with_max_depth(2)?;
/// assert!(canonicalize_with_options("[[1]]", Format::Json, &options).is_ok());
///
/// let err = canonicalize_with_options("[[[1]]]", Format::Json, &options).unwrap_err();
/// assert!(matches!(err, CanonicalizeError::TooLarge(_)));
/// assert_eq!(err.to_string(), "input has 3 levels of nesting, exceeding the limit of 2");
/// # Ok::<(), docdiff_core::OptionsError>(())
/// ```
pub fn canonicalize_with_options(
    text: &str,
    format: Format,
    options: &CompareOptions,
) -> Result<String, CanonicalizeError> {
    options.check(Measure::Bytes, text.len())?;
    options.check(Measure::Depth, depth::nesting_depth(text, format))?;
    Ok(canonicalize_unchecked(text, format)?)
}

fn canonicalize_unchecked(text: &str, format: Format) -> Result<String, ParseFailure> {
    let canonical = match format {
        Format::Json => json::canonicalize_json(text),
        Format::Xml => xml::canonicalize_xml(text),
    };
    match &canonical {
        Ok(output) => {
            trace!(%format, input_bytes = text.len(), output_bytes = output.len(), "canonicalized");
        }
        Err(failure) => {
            let (line, column) = (failure.line, failure.column);
            debug!(%format, ?line, ?column, "parse failed: {failure}");
        }
    }
    canonical
}
