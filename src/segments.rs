use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One timed span of transcribed text.
///
/// Times are offsets in seconds. We deliberately don't enforce `start <= end`:
/// upstream results occasionally contain out-of-order or zero-length spans and every
/// encoder passes them through unchanged.
///
/// `metadata` is kept as raw JSON. Only the JSON export reads it as a whole, and it is
/// written back exactly as received, whatever its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            metadata: None,
        }
    }

    /// Attach per-segment metadata (confidence, word timings, ...).
    pub fn with_metadata(mut self, metadata: impl Into<Value>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// `end - start`. Negative for out-of-order segments.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Recognition confidence, if the metadata carries a numeric one.
    pub fn confidence(&self) -> Option<f64> {
        self.metadata.as_ref()?.get("confidence")?.as_f64()
    }
}

/// Typed builder for the common metadata keys.
///
/// Converts into the raw JSON stored on [`Segment`]; `extra` keys are merged in last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMetadata {
    pub confidence: Option<f64>,
    pub words: Option<Vec<WordTiming>>,
    pub extra: Map<String, Value>,
}

/// A single word with its own timing inside a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl From<WordTiming> for Value {
    fn from(w: WordTiming) -> Self {
        let mut obj = Map::new();
        obj.insert("word".into(), w.word.into());
        obj.insert("start".into(), number_or_null(w.start));
        obj.insert("end".into(), number_or_null(w.end));
        Value::Object(obj)
    }
}

impl From<SegmentMetadata> for Value {
    fn from(m: SegmentMetadata) -> Self {
        let mut obj = Map::new();
        if let Some(confidence) = m.confidence {
            obj.insert("confidence".into(), number_or_null(confidence));
        }
        if let Some(words) = m.words {
            obj.insert(
                "words".into(),
                Value::Array(words.into_iter().map(Value::from).collect()),
            );
        }
        obj.extend(m.extra);
        Value::Object(obj)
    }
}

/// JSON has no NaN or infinity; those become `null`.
pub(crate) fn number_or_null(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// Largest `end` over all segments, or `0` for an empty list.
pub fn total_duration(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(|s| s.end)
        .reduce(f64::max)
        .unwrap_or(0.0)
}
