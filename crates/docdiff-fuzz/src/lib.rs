//! Fuzzing harnesses for the `docdiff` comparison engine.
//!
//! The helpers in this crate are shared by the `cargo fuzz` targets under
//! `fuzz/` and by the unit tests below. Each public function accepts raw
//! bytes, drives one stage of the pipeline and panics only when an invariant
//! of that stage is broken. Parse failures are expected and ignored.
//!
//! # Examples
//!
//! ```
//! docdiff_fuzz::fuzz_canonicalization(b"{\"a\":1}");
//! docdiff_fuzz::fuzz_compare(&[1, 2, 3, 4]);
//! docdiff_fuzz::fuzz_matching(b"matching");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use docdiff_core::diff::{classify, compute_matching, DiffLine, LineKind};
use docdiff_core::{canonicalize, compare_with_options, CompareOptions, DiffResult, Format};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const MAX_DEPTH: usize = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 6;
const MAX_STRING_LEN: u8 = 12;
const MAX_SEQUENCE_LEN: u8 = 64;

/// Feeds arbitrary bytes through both canonicalizers.
///
/// JSON output must be a fixed point of canonicalization; XML output must
/// parse again.
///
/// ```
/// docdiff_fuzz::fuzz_canonicalization(b"<a><b/></a>");
/// ```
pub fn fuzz_canonicalization(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(once) = canonicalize(text, Format::Json) {
        let twice = canonicalize(&once, Format::Json).expect("canonical JSON must reparse");
        assert_eq!(once, twice, "canonical JSON must be idempotent");
    }
    if let Ok(once) = canonicalize(text, Format::Xml) {
        canonicalize(&once, Format::Xml).expect("canonical XML must reparse");
    }
}

/// Compares randomly generated JSON documents and checks the result.
///
/// Every document must compare equal to itself, and every result must
/// account for each canonical line exactly once.
///
/// ```
/// docdiff_fuzz::fuzz_compare(b"seed");
/// ```
pub fn fuzz_compare(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Some(lhs) = random_document(&mut unstructured) else {
        return;
    };
    let Some(rhs) = random_document(&mut unstructured) else {
        return;
    };
    let options = CompareOptions::unbounded();

    let itself = compare_with_options(&lhs, &lhs, Format::Json, &options);
    assert!(itself.equal, "document must equal itself: {lhs}");
    assert!(itself.stats.is_empty());

    let result = compare_with_options(&lhs, &rhs, Format::Json, &options);
    check_coverage(&result);

    if let Ok(text) = std::str::from_utf8(unstructured.take_rest()) {
        if let Some((left, right)) = text.split_at_checked(text.len() / 2) {
            check_coverage(&compare_with_options(left, right, Format::Xml, &options));
        }
    }
}

/// Runs the line matcher and classifier on two small-alphabet sequences.
///
/// ```
/// docdiff_fuzz::fuzz_matching(&[0, 1, 2, 3, 4, 5]);
/// ```
pub fn fuzz_matching(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let (Ok(a), Ok(b)) = (random_lines(&mut unstructured), random_lines(&mut unstructured)) else {
        return;
    };

    let matching = compute_matching(&a, &b);
    for pair in &matching {
        assert_eq!(a[pair.left], b[pair.right], "matched lines must be equal");
    }
    for window in matching.pairs().windows(2) {
        assert!(window[0].left < window[1].left && window[0].right < window[1].right);
    }

    let (lines, stats) = classify(&a, &b, &matching);
    let same = count_same(&lines);
    assert_eq!(same, matching.len());
    assert_eq!(same + stats.removed + stats.changed, a.len());
    assert_eq!(same + stats.added + stats.changed, b.len());
}

fn check_coverage(result: &DiffResult) {
    let (Some(left), Some(right)) = (&result.left_normalized, &result.right_normalized) else {
        assert!(result.error.is_some(), "missing normalized text without an error");
        assert!(result.lines.is_empty(), "error results carry no lines");
        return;
    };
    let same = count_same(&result.lines);
    let stats = result.stats;
    assert_eq!(same + stats.removed + stats.changed, left.split('\n').count());
    assert_eq!(same + stats.added + stats.changed, right.split('\n').count());
    assert_eq!(result.equal, left == right);
}

fn count_same(lines: &[DiffLine]) -> usize {
    lines.iter().filter(|line| line.kind == LineKind::Same).count()
}

fn random_lines(unstructured: &mut Unstructured<'_>) -> Result<Vec<String>, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_SEQUENCE_LEN)?);
    let mut lines = Vec::with_capacity(len);
    for _ in 0..len {
        let symbol = unstructured.int_in_range::<u8>(b'a'..=b'e')?;
        lines.push(char::from(symbol).to_string());
    }
    Ok(lines)
}

fn random_document(unstructured: &mut Unstructured<'_>) -> Option<String> {
    let value = json_value_from_unstructured(unstructured, 0).ok()?;
    serde_json::to_string(&value).ok()
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    let choice = unstructured.int_in_range::<u8>(0..=5)?;
    match choice {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        3 => Ok(JsonValue::String(random_string(unstructured)?)),
        4 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
            let mut map = JsonMap::new();
            for _ in 0..len {
                let key = random_string(unstructured)?;
                let value = json_value_from_unstructured(unstructured, depth + 1)?;
                map.insert(key, value);
            }
            Ok(JsonValue::Object(map))
        }
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    match unstructured.int_in_range::<u8>(0..=3)? {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        _ => Ok(JsonValue::String(random_string(unstructured)?)),
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        Ok(JsonNumber::from(unstructured.arbitrary::<i64>()?))
    } else {
        let numerator = f64::from(unstructured.arbitrary::<i32>()?);
        let denominator = f64::from(unstructured.int_in_range::<u16>(1..=1024)?);
        JsonNumber::from_f64(numerator / denominator).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

fn random_string(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_STRING_LEN)?);
    let mut string = String::with_capacity(len);
    for _ in 0..len {
        let byte = unstructured.int_in_range::<u8>(0x20..=0x7e)?;
        string.push(char::from(byte));
    }
    Ok(string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_handles_both_formats() {
        fuzz_canonicalization(br#"{"b":[1,2],"a":null}"#);
        fuzz_canonicalization(b"<a x=\"1\"><b>text</b><!-- note --></a>");
        fuzz_canonicalization(&[0xff, 0xfe]);
    }

    #[test]
    fn compare_harness_runs() {
        fuzz_compare(b"compare harness seed with enough bytes <a/><a/>");
    }

    #[test]
    fn matching_harness_runs() {
        fuzz_matching(b"matching harness seed bytes");
        fuzz_matching(&[]);
    }
}
