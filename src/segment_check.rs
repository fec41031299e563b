//! Structural checks for segment lists that arrive as untyped JSON.
//!
//! Typed `&[Segment]` inputs are well-formed by construction. Lists parsed out of request
//! bodies or files are not, so we check them here before any encoder sees them.

use serde_json::{Map, Value};
use tracing::debug;

use crate::segments::Segment;
use crate::{Error, Result};

/// Check one untyped segment and convert it into a [`Segment`].
///
/// Fails when the element is absent (`null`), is not an object, or when `start`/`end`
/// are missing or not numbers. Everything else (out-of-order times, empty text, control
/// characters, metadata of any shape) is accepted verbatim.
pub fn check_segment(value: &Value, index: usize) -> Result<Segment> {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::Null => return Err(Error::invalid_segment(index, "segment is missing")),
        other => {
            return Err(Error::invalid_segment(
                index,
                format!("expected an object, got {}", kind_of(other)),
            ));
        }
    };

    let start = numeric_field(obj, "start", index)?;
    let end = numeric_field(obj, "end", index)?;

    let text = match obj.get("text") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let metadata = obj.get("metadata").filter(|m| !m.is_null()).cloned();

    Ok(Segment {
        start,
        end,
        text,
        metadata,
    })
}

/// Check an untyped segment list.
///
/// A non-array (including `null`) fails before any per-segment work. Otherwise we stop at
/// the first invalid element, so the error always names a single index.
pub fn parse_segments(value: &Value) -> Result<Vec<Segment>> {
    let Value::Array(items) = value else {
        return Err(Error::NotASequence {
            found: kind_of(value),
        });
    };

    let segments = items
        .iter()
        .enumerate()
        .map(|(index, item)| check_segment(item, index))
        .collect::<Result<Vec<_>>>()?;

    debug!(count = segments.len(), "parsed segment list");
    Ok(segments)
}

fn numeric_field(obj: &Map<String, Value>, key: &str, index: usize) -> Result<f64> {
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::invalid_segment(index, format!("{key} is not representable"))),
        Some(other) => Err(Error::invalid_segment(
            index,
            format!("{key} must be a number, got {}", kind_of(other)),
        )),
        None => Err(Error::invalid_segment(index, format!("{key} is missing"))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_segments() -> anyhow::Result<()> {
        let seg = check_segment(&json!({"start": 1, "end": 2.5, "text": "hi"}), 0)?;
        assert_eq!(seg, Segment::new(1.0, 2.5, "hi"));
        Ok(())
    }

    #[test]
    fn accepts_out_of_order_and_empty_text() -> anyhow::Result<()> {
        let seg = check_segment(&json!({"start": 5, "end": 2}), 0)?;
        assert_eq!(seg.text, "");
        assert_eq!(seg.duration(), -3.0);

        let seg = check_segment(&json!({"start": 1, "end": 1, "text": "a\tb\nc\u{0007}"}), 0)?;
        assert_eq!(seg.text, "a\tb\nc\u{0007}");
        Ok(())
    }

    #[test]
    fn rejects_non_numeric_start() {
        let err = check_segment(&json!({"start": "x", "end": 1}), 0).unwrap_err();
        assert_eq!(err.segment_index(), Some(0));
        assert!(err.to_string().contains("index 0"));
        assert!(err.to_string().contains("start must be a number"));
    }

    #[test]
    fn rejects_missing_end_and_null_element() {
        let err = check_segment(&json!({"start": 0}), 4).unwrap_err();
        assert_eq!(err.segment_index(), Some(4));
        assert!(err.to_string().contains("end is missing"));

        let err = check_segment(&Value::Null, 2).unwrap_err();
        assert_eq!(err.segment_index(), Some(2));
    }

    #[test]
    fn parse_rejects_non_sequences() {
        for v in [Value::Null, json!({"start": 0}), json!("segments"), json!(3)] {
            let err = parse_segments(&v).unwrap_err();
            assert!(err.to_string().contains("must be a sequence"), "{err}");
        }
    }

    #[test]
    fn parse_stops_at_first_invalid_index() {
        let v = json!([
            {"start": 0, "end": 1, "text": "ok"},
            {"start": 1, "end": "2"},
            {"start": null, "end": 3}
        ]);
        let err = parse_segments(&v).unwrap_err();
        assert_eq!(err.segment_index(), Some(1));
    }

    #[test]
    fn parse_keeps_metadata() -> anyhow::Result<()> {
        let v = json!([{
            "start": 0, "end": 1, "text": "hi",
            "metadata": {"confidence": 0.8, "words": [{"word": "hi", "start": 0, "end": 1}]}
        }]);
        let segs = parse_segments(&v)?;
        assert_eq!(segs[0].confidence(), Some(0.8));
        let words = segs[0].metadata.as_ref().and_then(|m| m["words"].as_array());
        assert_eq!(words.map(Vec::len), Some(1));
        Ok(())
    }

    #[test]
    fn malformed_metadata_is_not_a_structural_failure() -> anyhow::Result<()> {
        let v = json!([
            {"start": 0, "end": 1, "metadata": {"confidence": "high"}},
            {"start": 1, "end": 2, "metadata": {"words": [{"word": "hi"}]}},
            {"start": 2, "end": 3, "metadata": []},
            {"start": 3, "end": 4, "metadata": "x"},
            {"start": 4, "end": 5, "metadata": null}
        ]);
        let segs = parse_segments(&v)?;
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[0].metadata, Some(json!({"confidence": "high"})));
        assert_eq!(segs[2].metadata, Some(json!([])));
        assert_eq!(segs[3].metadata, Some(json!("x")));
        assert_eq!(segs[4].metadata, None);
        Ok(())
    }
}
