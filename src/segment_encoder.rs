use crate::Result;
use crate::segments::Segment;

/// A streaming sink that serializes segments into one artifact format.
///
/// Callers write segments in order and then call `close` exactly once to finalize
/// the artifact. `close` is idempotent; writes after it fail with
/// [`crate::Error::EncoderClosed`].
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
