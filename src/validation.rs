//! Pre-flight checks for a transcription request.
//!
//! Validators never fail with `Err`: they return a [`ValidationResult`] that the caller
//! renders as-is. Hard errors flip `is_valid`; warnings are advisory and never block.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::opts::ValidationOpts;

/// Declared media types we accept without looking at the extension.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/webm",
    "audio/ogg",
    "audio/flac",
    "audio/x-flac",
    "video/mp4",
    "video/mpeg",
    "video/webm",
];

/// File extensions (lowercase, no dot) we trust when the media type is unknown.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "mpeg", "mpga", "m4a", "wav", "webm", "ogg", "oga", "flac",
];

/// Two lowercase letters, optionally followed by `-` and two uppercase letters.
static LANGUAGE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("language code regex"));

pub const LOW_TEMPERATURE_THRESHOLD: f64 = 0.1;
pub const HIGH_TEMPERATURE_THRESHOLD: f64 = 0.9;

/// Outcome of a validation call.
///
/// `error_message` is present iff `is_valid` is false. It may hold several messages
/// joined with `"; "` when produced by [`crate::settings::validate_settings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
            warnings: Vec::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A file offered for upload, as described by the upload widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFile {
    pub name: Option<String>,

    /// Declared MIME type, e.g. `audio/mpeg`. Browsers often leave this empty.
    #[serde(default, alias = "type")]
    pub media_type: Option<String>,

    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

impl AudioFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Check that a file looks like audio/video we can submit.
///
/// The declared media type wins. If it's missing or unknown but the extension is on the
/// allow-list, the file is accepted with a warning. Oversized files get a warning only.
pub fn validate_audio_file(file: Option<&AudioFile>, opts: &ValidationOpts) -> ValidationResult {
    let Some(file) = file else {
        return ValidationResult::invalid("No file provided");
    };
    let Some(name) = file.name.as_deref().filter(|n| !n.is_empty()) else {
        return ValidationResult::invalid("File name is missing");
    };

    let media_type = file
        .media_type
        .as_deref()
        .map(normalize_media_type)
        .filter(|t| !t.is_empty());
    let type_ok = media_type
        .as_deref()
        .is_some_and(|t| SUPPORTED_MEDIA_TYPES.contains(&t));

    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty());
    let ext_ok = extension
        .as_deref()
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e));

    let mut result = if type_ok {
        ValidationResult::valid()
    } else if ext_ok {
        let ext = extension.as_deref().unwrap_or_default();
        let warning = match media_type.as_deref() {
            Some(t) => format!(
                "File type '{t}' was not recognized; accepted based on the .{ext} extension"
            ),
            None => {
                format!("File type was not provided; accepted based on the .{ext} extension")
            }
        };
        ValidationResult::valid().with_warning(warning)
    } else {
        debug!(file = name, media_type = ?media_type, "rejected unsupported file");
        ValidationResult::invalid(format!(
            "Unsupported file type for '{name}'. Supported formats: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        ))
    };

    if let Some(size) = file.size.filter(|&s| s > opts.max_file_bytes) {
        result.warnings.push(format!(
            "File is {} which exceeds the {} limit and may be rejected",
            human_bytes(size),
            human_bytes(opts.max_file_bytes)
        ));
    }

    result
}

/// Check a sampling temperature.
///
/// Valid iff finite and within `[0, 1]`. Values below 0.1 or above 0.9 carry a warning.
pub fn validate_temperature(temperature: f64) -> ValidationResult {
    if !temperature.is_finite() {
        return ValidationResult::invalid("Temperature must be a finite number");
    }
    if !(0.0..=1.0).contains(&temperature) {
        return ValidationResult::invalid(format!(
            "Temperature must be between 0 and 1, got {temperature}"
        ));
    }

    if temperature < LOW_TEMPERATURE_THRESHOLD {
        ValidationResult::valid()
            .with_warning("Very low temperature (< 0.1) may produce repetitive output")
    } else if temperature > HIGH_TEMPERATURE_THRESHOLD {
        ValidationResult::valid()
            .with_warning("Very high temperature (> 0.9) may produce inconsistent output")
    } else {
        ValidationResult::valid()
    }
}

/// Check a language code such as `en` or `en-US`.
///
/// `None` (an absent value) is a hard error, like any other malformed code.
pub fn validate_language(language: Option<&str>) -> ValidationResult {
    match language {
        Some(code) if LANGUAGE_CODE_RE.is_match(code) => ValidationResult::valid(),
        Some(code) => ValidationResult::invalid(format!(
            "Invalid language code '{code}'. Expected a two-letter code like 'en' or 'en-US'"
        )),
        None => ValidationResult::invalid(
            "Language code is required. Expected a two-letter code like 'en' or 'en-US'",
        ),
    }
}

/// Lowercase and strip parameters (`audio/webm;codecs=opus` → `audio/webm`).
fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn human_bytes(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    format!("{:.1} MB", bytes as f64 / MIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_file_missing_or_nameless_is_invalid() {
        let opts = ValidationOpts::default();
        let res = validate_audio_file(None, &opts);
        assert!(!res.is_valid);
        assert_eq!(res.error_message.as_deref(), Some("No file provided"));

        let res = validate_audio_file(Some(&AudioFile::default()), &opts);
        assert!(!res.is_valid);
        assert_eq!(res.error_message.as_deref(), Some("File name is missing"));
    }

    #[test]
    fn audio_file_known_type_is_valid_without_warnings() {
        let file = AudioFile::new("clip.bin").with_media_type("audio/mpeg");
        let res = validate_audio_file(Some(&file), &ValidationOpts::default());
        assert_eq!(res, ValidationResult::valid());
    }

    #[test]
    fn audio_file_media_type_parameters_are_ignored() {
        let file = AudioFile::new("rec").with_media_type("Audio/WebM; codecs=opus");
        let res = validate_audio_file(Some(&file), &ValidationOpts::default());
        assert!(res.is_valid);
        assert!(!res.has_warnings());
    }

    #[test]
    fn audio_file_extension_fallback_warns() {
        let file = AudioFile::new("Meeting.M4A").with_media_type("application/octet-stream");
        let res = validate_audio_file(Some(&file), &ValidationOpts::default());
        assert!(res.is_valid);
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("not recognized"));
        assert!(res.warnings[0].contains(".m4a"));

        let res = validate_audio_file(Some(&AudioFile::new("a.wav")), &ValidationOpts::default());
        assert!(res.is_valid);
        assert!(res.warnings[0].contains("not provided"));
    }

    #[test]
    fn audio_file_bare_extension_name_is_accepted() {
        let res = validate_audio_file(Some(&AudioFile::new(".mp3")), &ValidationOpts::default());
        assert!(res.is_valid);
        assert!(res.warnings[0].contains(".mp3"));

        let res = validate_audio_file(Some(&AudioFile::new("take.")), &ValidationOpts::default());
        assert!(!res.is_valid);
    }

    #[test]
    fn audio_file_unknown_type_and_extension_is_invalid() {
        let file = AudioFile::new("notes.txt").with_media_type("text/plain");
        let res = validate_audio_file(Some(&file), &ValidationOpts::default());
        assert!(!res.is_valid);
        assert!(res.error_message.as_deref().unwrap_or_default().contains("notes.txt"));
    }

    #[test]
    fn audio_file_oversize_warns_but_stays_valid() {
        let opts = ValidationOpts { max_file_bytes: 1000 };
        let file = AudioFile::new("a.mp3")
            .with_media_type("audio/mpeg")
            .with_size(1001);
        let res = validate_audio_file(Some(&file), &opts);
        assert!(res.is_valid);
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("exceeds"));

        let at_limit = file.clone().with_size(1000);
        assert!(!validate_audio_file(Some(&at_limit), &opts).has_warnings());
    }

    #[test]
    fn temperature_bounds() {
        for t in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let res = validate_temperature(t);
            assert!(res.is_valid, "{t}");
            assert!(!res.has_warnings(), "{t}");
        }
        for t in [-0.1, 1.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let res = validate_temperature(t);
            assert!(!res.is_valid, "{t}");
            assert!(res.error_message.is_some());
        }
    }

    #[test]
    fn temperature_extremes_warn() {
        let low = validate_temperature(0.05);
        assert!(low.is_valid);
        assert!(low.warnings[0].contains("repetitive"));

        let high = validate_temperature(0.95);
        assert!(high.is_valid);
        assert!(high.warnings[0].contains("inconsistent"));
    }

    #[test]
    fn language_codes() {
        for code in ["en", "en-US", "pt-BR"] {
            assert!(validate_language(Some(code)).is_valid, "{code}");
        }
        for code in ["", "e", "en_US", "EN", "eng", "en-us", "en-USA", " en"] {
            let res = validate_language(Some(code));
            assert!(!res.is_valid, "{code}");
            assert!(res.error_message.as_deref().unwrap_or_default().contains("'en-US'"));
        }
        assert!(!validate_language(None).is_valid);
    }

    #[test]
    fn result_serializes_camel_case() -> anyhow::Result<()> {
        let v = serde_json::to_value(ValidationResult::invalid("nope"))?;
        assert_eq!(v, serde_json::json!({"isValid": false, "errorMessage": "nope"}));
        Ok(())
    }
}
