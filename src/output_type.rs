use std::fmt;
use std::str::FromStr;

#[cfg(feature = "cli")]
use clap::ValueEnum;

use crate::Error;

/// The supported artifact formats for exported segments.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of output formats
///   across the CLI and library code.
/// - Using an enum avoids stringly-typed conditionals and keeps format
///   selection explicit and discoverable.
///
/// Integration notes:
/// - With the `cli` feature, `ValueEnum` allows this enum to be used directly as a flag.
/// - Each variant maps to a concrete `SegmentEncoder` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum OutputType {
    /// WebVTT captions.
    Vtt,

    /// SubRip captions.
    Srt,

    /// A JSON document with metadata and numbered records.
    Json,

    /// A CSV table, one row per segment.
    Csv,
}

impl OutputType {
    pub const ALL: [OutputType; 4] = [Self::Vtt, Self::Srt, Self::Json, Self::Csv];

    /// Lowercase name, also used as the file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vtt => "vtt",
            Self::Srt => "srt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn file_extension(self) -> &'static str {
        self.as_str()
    }

    /// MIME type for serving the artifact as a download.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Vtt => "text/vtt; charset=utf-8",
            Self::Srt => "application/x-subrip; charset=utf-8",
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                Error::msg(format!(
                    "unsupported output type '{s}' (vtt, srt, json, csv)"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() -> anyhow::Result<()> {
        assert_eq!(" VTT ".parse::<OutputType>()?, OutputType::Vtt);
        assert_eq!("csv".parse::<OutputType>()?, OutputType::Csv);
        Ok(())
    }

    #[test]
    fn rejects_unknown_formats() {
        let err = "ass".parse::<OutputType>().unwrap_err();
        assert!(err.to_string().contains("unsupported output type"));
    }

    #[test]
    fn display_round_trips_through_from_str() -> anyhow::Result<()> {
        for t in OutputType::ALL {
            assert_eq!(t.to_string().parse::<OutputType>()?, t);
            assert_eq!(t.file_extension(), t.as_str());
        }
        Ok(())
    }
}
