use std::io::Write;

use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::{Error, Result};

/// Header row written before any data rows.
pub const CSV_HEADER: &str = "id,start,end,duration,text,confidence";

/// A `SegmentEncoder` that writes one CSV row per segment.
///
/// Rows are separated by `\n` with no trailing newline. `text` is always quoted with
/// embedded `"` doubled; nothing else is escaped, so commas and newlines inside the
/// text stay literal within the quotes. `duration` has exactly three decimals and
/// `confidence` is left blank when the segment has none.
pub struct CsvEncoder<W: Write> {
    w: W,
    rows: usize,
    started: bool,
    closed: bool,
}

impl<W: Write> CsvEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            rows: 0,
            started: false,
            closed: false,
        }
    }

    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(CSV_HEADER.as_bytes())?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for CsvEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(Error::EncoderClosed);
        }

        self.start_if_needed()?;
        self.rows += 1;

        let confidence = seg.confidence().map(|c| c.to_string()).unwrap_or_default();

        write!(
            &mut self.w,
            "\n{},{},{},{},{},{}",
            self.rows,
            seg.start,
            seg.end,
            fixed3(seg.duration()),
            quote(&seg.text),
            confidence
        )?;

        Ok(())
    }

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

/// Format with exactly three decimals, rounding exact ties away from zero.
///
/// `{:.3}` rounds ties to even, so 0.0625 would come out as `0.062`. An f64 sits exactly
/// halfway between two thousandths only when `16 * v` is an odd integer; those cases are
/// rounded by hand, everything else goes through the formatter.
fn fixed3(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if v == 0.0 {
        return "0.000".to_owned();
    }

    let sixteenths = v.abs() * 16.0;
    if sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 {
        // v = m/16 with m odd, so v * 1000 = m * 62.5 and the tie rounds up to (125m + 1) / 2.
        let millis = (sixteenths as u64 * 125 + 1) / 2;
        let sign = if v < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:03}", millis / 1000, millis % 1000);
    }

    format!("{v:.3}")
}

/// Wrap `text` in double quotes, doubling any embedded quote characters.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::SegmentMetadata;

    fn encode(segments: &[Segment]) -> anyhow::Result<String> {
        let mut out = Vec::new();
        let mut enc = CsvEncoder::new(&mut out);
        for seg in segments {
            enc.write_segment(seg)?;
        }
        enc.close()?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn csv_empty_list_is_header_only() -> anyhow::Result<()> {
        assert_eq!(encode(&[])?, CSV_HEADER);
        Ok(())
    }

    #[test]
    fn csv_doubles_embedded_quotes() -> anyhow::Result<()> {
        let s = encode(&[Segment::new(0.0, 2.5, r#"Hello, "world"!"#)])?;
        assert_eq!(
            s,
            "id,start,end,duration,text,confidence\n1,0,2.5,2.500,\"Hello, \"\"world\"\"!\","
        );
        Ok(())
    }

    #[test]
    fn csv_keeps_newlines_and_delimiters_inside_quotes() -> anyhow::Result<()> {
        let s = encode(&[Segment::new(1.0, 1.0, "a,b\nc")])?;
        assert!(s.ends_with("\n1,1,1,0.000,\"a,b\nc\","), "{s}");
        Ok(())
    }

    #[test]
    fn csv_writes_confidence_when_present() -> anyhow::Result<()> {
        let meta = SegmentMetadata {
            confidence: Some(0.92),
            ..Default::default()
        };
        let s = encode(&[
            Segment::new(0.0, 1.0, "x").with_metadata(meta),
            Segment::new(4.0, 3.0, "y"),
        ])?;
        let rows: Vec<&str> = s.split('\n').collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "1,0,1,1.000,\"x\",0.92");
        assert_eq!(rows[2], "2,4,3,-1.000,\"y\",");
        Ok(())
    }

    #[test]
    fn fixed3_rounds_ties_away_from_zero() {
        assert_eq!(fixed3(0.0625), "0.063");
        assert_eq!(fixed3(-0.0625), "-0.063");
        assert_eq!(fixed3(0.3125), "0.313");
        assert_eq!(fixed3(1.0625), "1.063");
        assert_eq!(fixed3(2.5), "2.500");
        assert_eq!(fixed3(4.749), "4.749");
        assert_eq!(fixed3(-0.0), "0.000");
        assert_eq!(fixed3(f64::INFINITY), "Infinity");
    }

    #[test]
    fn csv_duration_ties_round_up() -> anyhow::Result<()> {
        let s = encode(&[Segment::new(0.0, 0.0625, "a"), Segment::new(1.0, 1.3125, "b")])?;
        let rows: Vec<&str> = s.split('\n').collect();
        assert_eq!(rows[1], "1,0,0.0625,0.063,\"a\",");
        assert_eq!(rows[2], "2,1,1.3125,0.313,\"b\",");
        Ok(())
    }

    #[test]
    fn csv_leaves_non_numeric_confidence_blank() -> anyhow::Result<()> {
        let seg = Segment::new(0.0, 1.0, "x")
            .with_metadata(serde_json::json!({"confidence": "high"}));
        assert_eq!(encode(&[seg])?.split('\n').nth(1), Some("1,0,1,1.000,\"x\","));
        Ok(())
    }
}
