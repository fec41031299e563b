//! `segment-export` turns timed transcription segments into downloadable artifacts and
//! checks transcription requests before they are submitted.
//!
//! This crate provides:
//! - A floor-based seconds → `HH:MM:SS.mmm` timecode formatter
//! - Streaming encoders for WebVTT, SRT, a JSON document, and CSV
//! - Structural checks for untyped (JSON) segment lists
//! - Pre-flight validators for audio files, temperature, language codes, and settings
//!
//! Everything here is synchronous and side-effect free apart from writing to the
//! caller's `Write`, so it is safe to call from any number of threads.

mod error;

pub use error::{Error, Result};

// High-level API (most consumers should start here).
pub mod export;
pub mod opts;

// Segment data structures and structural checks.
pub mod segment_check;
pub mod segments;
pub mod timecode;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod segment_encoder;

// Output encoders that serialize segments into various formats.
pub mod csv_encoder;
pub mod json_document_encoder;
pub mod srt_encoder;
pub mod vtt_encoder;

// Pre-flight validation.
pub mod settings;
pub mod validation;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use export::{encode_segments, encode_value, write_artifact};
pub use opts::{ExportOpts, ValidationOpts};
pub use output_type::OutputType;
pub use segments::{Segment, SegmentMetadata, WordTiming};
pub use settings::{SettingsBundle, validate_settings};
pub use timecode::format_timecode;
pub use validation::{
    AudioFile, ValidationResult, validate_audio_file, validate_language, validate_temperature,
};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
