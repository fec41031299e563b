use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validation::{ValidationResult, validate_language, validate_temperature};

/// Prompts longer than this (in characters) get an advisory warning.
pub const MAX_PROMPT_CHARS: usize = 1000;

/// The user-adjustable knobs sent along with a transcription request.
///
/// Every field is optional; only the ones present are checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Passed through to the API; nothing to validate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vad_filter: Option<bool>,
}

/// Validate every present field of `settings` and merge the results.
///
/// Checks run in a fixed order (temperature, language, prompt length) so warnings come
/// out in that order. Hard errors are joined with `"; "`. The bundle is valid iff no
/// check produced a hard error; warnings never affect validity.
pub fn validate_settings(settings: &SettingsBundle) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let mut absorb = |res: ValidationResult| {
        if let Some(message) = res.error_message {
            errors.push(message);
        }
        warnings.extend(res.warnings);
    };

    if let Some(temperature) = settings.temperature {
        absorb(validate_temperature(temperature));
    }

    if let Some(language) = settings.language.as_deref() {
        absorb(validate_language(Some(language)));
    }

    if let Some(prompt) = settings.prompt.as_deref() {
        let chars = prompt.chars().count();
        if chars > MAX_PROMPT_CHARS {
            warnings.push(format!(
                "Prompt is {chars} characters; prompts over {MAX_PROMPT_CHARS} characters \
                 may be truncated"
            ));
        }
    }

    if errors.is_empty() {
        ValidationResult {
            is_valid: true,
            error_message: None,
            warnings,
        }
    } else {
        debug!(errors = errors.len(), "settings failed validation");
        ValidationResult {
            is_valid: false,
            error_message: Some(errors.join("; ")),
            warnings,
        }
    }
}
