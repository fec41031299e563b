use std::io::Write;

use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::timecode::format_timecode_with;
use crate::{Error, Result};

/// A `SegmentEncoder` that writes segments in SubRip (SRT) format.
///
/// Output matches "all cues joined by a blank line, trailing whitespace trimmed":
/// - there is no header, and an empty list produces no bytes at all
/// - timing lines use `,` before the milliseconds
/// - whitespace at the very end of the file (including trailing whitespace in the last
///   cue's text) is dropped
///
/// To keep streaming, we hold back any trailing whitespace of what we've written so far
/// and only release it once more non-whitespace output follows.
pub struct SrtEncoder<W: Write> {
    w: W,

    /// Whitespace written "logically" but not yet flushed to `w`.
    pending_ws: String,

    cues: usize,
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            pending_ws: String::new(),
            cues: 0,
            closed: false,
        }
    }

    fn emit(&mut self, chunk: &str) -> Result<()> {
        let content = chunk.trim_end();
        if content.is_empty() {
            self.pending_ws.push_str(chunk);
            return Ok(());
        }

        self.w.write_all(self.pending_ws.as_bytes())?;
        self.w.write_all(content.as_bytes())?;

        self.pending_ws.clear();
        self.pending_ws.push_str(&chunk[content.len()..]);
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        if self.cues > 0 {
            self.emit("\n\n")?;
        }
        self.cues += 1;

        let start = format_timecode_with(seg.start, ',');
        let end = format_timecode_with(seg.end, ',');

        let cue = format!("{}\n{start} --> {end}\n{}", self.cues, seg.text);
        self.emit(&cue)
    }

    /// Drop any held-back trailing whitespace and flush. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.pending_ws.clear();
        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}
