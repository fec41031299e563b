//! Whole-list export entry points.
//!
//! Callers hand us a complete segment list and get back one artifact. We pick the
//! encoder from `OutputType`, feed it every segment, and finalize it.
//!
//! Untyped lists go through [`parse_segments`] first, so a bad element fails the whole
//! call before any byte is produced. No partial artifact is ever returned.

use std::io::Write;

use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::csv_encoder::CsvEncoder;
use crate::json_document_encoder::JsonDocumentEncoder;
use crate::opts::ExportOpts;
use crate::output_type::OutputType;
use crate::segment_check::parse_segments;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::srt_encoder::SrtEncoder;
use crate::vtt_encoder::VttEncoder;

/// Encode `segments` into the requested format and write the artifact to `w`.
pub fn write_artifact<W>(
    output_type: OutputType,
    segments: &[Segment],
    w: W,
    opts: &ExportOpts,
) -> Result<()>
where
    W: Write,
{
    debug!(format = %output_type, count = segments.len(), "encoding segments");

    // Select an encoder based on the requested output type.
    // We keep this explicit (no trait objects) so each arm is monomorphized.
    match output_type {
        OutputType::Vtt => run_encoder(VttEncoder::new(w), segments),
        OutputType::Srt => run_encoder(SrtEncoder::new(w), segments),
        OutputType::Json => run_encoder(JsonDocumentEncoder::with_opts(w, opts), segments),
        OutputType::Csv => run_encoder(CsvEncoder::new(w), segments),
    }
}

/// Encode typed segments into an in-memory artifact.
pub fn encode_segments(
    output_type: OutputType,
    segments: &[Segment],
    opts: &ExportOpts,
) -> Result<String> {
    let mut out = Vec::new();
    write_artifact(output_type, segments, &mut out, opts)?;
    Ok(String::from_utf8(out)?)
}

/// Check an untyped segment list, then encode it.
///
/// Fails with [`crate::Error::NotASequence`] for non-arrays and
/// [`crate::Error::InvalidSegment`] (naming the index) for the first malformed element.
pub fn encode_value(
    output_type: OutputType,
    segments: &Value,
    opts: &ExportOpts,
) -> Result<String> {
    let segments = parse_segments(segments)?;
    encode_segments(output_type, &segments, opts)
}

fn run_encoder<E: SegmentEncoder>(mut encoder: E, segments: &[Segment]) -> Result<()> {
    let run_res = segments.iter().try_for_each(|seg| encoder.write_segment(seg));
    merge_run_and_close(run_res, encoder.close())
}

fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}
