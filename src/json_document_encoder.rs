use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::opts::ExportOpts;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::{Segment, number_or_null};
use crate::{Error, Result};

/// Version tag written into every document's metadata.
pub const SCHEMA_VERSION: &str = "1.0";

/// A `SegmentEncoder` that writes a single JSON document.
///
/// Design:
/// - Unlike the caption encoders we can't stream: the document's `metadata` block
///   carries `segmentCount` and `totalDuration`, which are only known once every
///   segment has been seen. We buffer records and write everything on `close`.
/// - Output is pretty-printed with two-space indentation.
///
/// Example output:
/// ```json
/// {
///   "metadata": {
///     "version": "1.0",
///     "generatedAt": "2024-01-01T00:00:00.000Z",
///     "segmentCount": 1,
///     "totalDuration": 1.2
///   },
///   "segments": [
///     { "id": 1, "start": 0.0, "end": 1.2, "duration": 1.2, "text": "hello" }
///   ]
/// }
/// ```
pub struct JsonDocumentEncoder<W: Write> {
    /// The underlying writer the document is written to on close.
    w: W,

    /// Caller-supplied metadata fields, merged over the computed ones.
    extra_metadata: Map<String, Value>,

    generated_at: Option<DateTime<Utc>>,

    records: Vec<JsonRecord>,

    /// Running `max(end)`; `None` until the first segment.
    max_end: Option<f64>,

    closed: bool,
}

#[derive(Debug, Serialize)]
struct JsonRecord {
    id: usize,
    start: f64,
    end: f64,
    duration: f64,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    metadata: Map<String, Value>,
    segments: &'a [JsonRecord],
}

impl<W: Write> JsonDocumentEncoder<W> {
    /// Create a JSON document encoder with no caller metadata and a live timestamp.
    pub fn new(w: W) -> Self {
        Self::with_opts(w, &ExportOpts::default())
    }

    /// Create a JSON document encoder using the metadata and timestamp from `opts`.
    pub fn with_opts(w: W, opts: &ExportOpts) -> Self {
        Self {
            w,
            extra_metadata: opts.metadata.clone(),
            generated_at: opts.generated_at,
            records: Vec::new(),
            max_end: None,
            closed: false,
        }
    }

    fn document_metadata(&self) -> Map<String, Value> {
        let generated_at = self
            .generated_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut metadata = Map::new();
        metadata.insert("version".into(), SCHEMA_VERSION.into());
        metadata.insert("generatedAt".into(), generated_at.into());
        metadata.insert("segmentCount".into(), self.records.len().into());
        metadata.insert(
            "totalDuration".into(),
            number_or_null(self.max_end.unwrap_or(0.0)),
        );

        for (key, value) in &self.extra_metadata {
            metadata.insert(key.clone(), value.clone());
        }
        metadata
    }
}

impl<W: Write> SegmentEncoder for JsonDocumentEncoder<W> {
    /// Buffer a single segment as a numbered record.
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        self.max_end = Some(match self.max_end {
            Some(max) => max.max(seg.end),
            None => seg.end,
        });

        self.records.push(JsonRecord {
            id: self.records.len() + 1,
            start: seg.start,
            end: seg.end,
            duration: seg.duration(),
            text: seg.text.clone(),
            metadata: seg.metadata.clone(),
        });

        Ok(())
    }

    /// Write the document and flush the underlying writer.
    ///
    /// This method is idempotent:
    /// - Calling `close()` multiple times is safe.
    /// - After closing, no further segments may be written.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let doc = JsonDocument {
            metadata: self.document_metadata(),
            segments: &self.records,
        };
        serde_json::to_writer_pretty(&mut self.w, &doc)?;
        self.w.flush()?;

        self.records.clear();
        self.closed = true;
        Ok(())
    }
}
