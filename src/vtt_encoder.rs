use std::io::Write;

use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::timecode::format_timecode;
use crate::{Error, Result};

/// A `SegmentEncoder` that writes segments in WebVTT format.
///
/// Design:
/// - We stream output directly to a `Write` implementation.
/// - We write the `WEBVTT` header lazily on the first segment, or on close when no
///   segment was written, so an empty list still yields a well-formed file.
/// - Each cue carries a 1-based identifier line before its timing line.
pub struct VttEncoder<W: Write> {
    /// The underlying writer we stream VTT into.
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// Number of cues written so far.
    cues: usize,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Create a new VTT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            cues: 0,
            closed: false,
        }
    }

    /// Write the WebVTT header if we haven't written it yet.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            // WebVTT files begin with a mandatory header line followed by a blank line.
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for VttEncoder<W> {
    /// Write a single cue in WebVTT format.
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        self.start_if_needed()?;
        self.cues += 1;

        let start = format_timecode(seg.start);
        let end = format_timecode(seg.end);

        // Cue identifier, timing line, then the text verbatim. A blank line separates cues.
        write!(
            &mut self.w,
            "{}\n{start} --> {end}\n{}\n\n",
            self.cues, seg.text
        )?;

        Ok(())
    }

    /// Emit the header if nothing was written, then flush. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.start_if_needed()?;
        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}
