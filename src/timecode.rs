//! Seconds → `HH:MM:SS.mmm` timecodes shared by the caption encoders.
//!
//! Rounding policy:
//! - We floor the *combined* millisecond count once (`floor(seconds * 1000)`) and then
//!   split it into fields. We never round, and never round per field.
//! - So `59.9999` renders as `00:00:59.999`, not `00:01:00.000`. Existing caption files
//!   depend on this; changing it is a compatibility break.

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Format seconds as a WebVTT-style timecode (`HH:MM:SS.mmm`).
///
/// NaN, infinities and negative values all format as `00:00:00.000`.
pub fn format_timecode(seconds: f64) -> String {
    format_timecode_with(seconds, '.')
}

/// Format seconds as a timecode using `separator` before the milliseconds field.
///
/// SRT uses `,`; WebVTT uses `.`.
pub fn format_timecode_with(seconds: f64, separator: char) -> String {
    let total_ms = total_millis(seconds);

    let h = total_ms / MS_PER_HOUR;
    let m = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let s = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let ms = total_ms % MS_PER_SECOND;

    format!("{h:02}:{m:02}:{s:02}{separator}{ms:03}")
}

/// Whole milliseconds in `seconds`, floored and clamped to zero.
fn total_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds < 0.0 {
        return 0;
    }

    // `as` saturates at u64::MAX for out-of-range values.
    (seconds * 1000.0).floor().max(0.0) as u64
}
