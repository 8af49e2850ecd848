use serde_json::{Map, Value};

use crate::{Format, ParseFailure};

pub(super) fn canonicalize_json(text: &str) -> Result<String, ParseFailure> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        ParseFailure::new(Format::Json, err.to_string()).at(err.line(), err.column())
    })?;
    serde_json::to_string_pretty(&sort_keys(value))
        .map_err(|err| ParseFailure::new(Format::Json, err.to_string()))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_keys_are_sorted_and_arrays_keep_order() {
        let canonical = canonicalize_json(r#"{"z":[3,1,{"y":1,"x":2}],"a":null}"#).unwrap();
        let expected = concat!(
            "{\n  \"a\": null,\n  \"z\": [\n    3,\n    1,\n",
            "    {\n      \"x\": 2,\n      \"y\": 1\n    }\n  ]\n}"
        );
        assert_eq!(canonical, expected);
    }

    #[test]
    fn empty_containers_stay_on_one_line() {
        assert_eq!(canonicalize_json(" { } ").unwrap(), "{}");
        assert_eq!(canonicalize_json("[]").unwrap(), "[]");
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(canonicalize_json("\"text\"").unwrap(), "\"text\"");
        assert_eq!(canonicalize_json("true").unwrap(), "true");
        assert_eq!(canonicalize_json("-12").unwrap(), "-12");
    }

    #[test]
    fn malformed_json_reports_position() {
        let failure = canonicalize_json("{\n  \"a\": 1,\n  oops\n}").unwrap_err();
        assert_eq!(failure.format, Format::Json);
        assert_eq!(failure.line, Some(3));
        assert_eq!(failure.column, Some(3));
        assert!(failure.message.contains("line 3"), "{}", failure.message);
    }

    #[test]
    fn truncated_json_is_an_error() {
        let failure = canonicalize_json("{bad").unwrap_err();
        assert!(!failure.message.is_empty());
        assert_eq!(failure.line, Some(1));
    }
}
