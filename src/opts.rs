use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Default upload size above which we warn (25 MiB, the usual hosted-API request cap).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 25 * 1024 * 1024;

/// Options that control how an artifact is exported.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (APIs, tests, batch jobs) can construct options programmatically
#[derive(Debug, Clone, Default)]
pub struct ExportOpts {
    /// Extra fields merged into the JSON document's `metadata` object.
    ///
    /// Caller fields win over the computed ones (`version`, `generatedAt`,
    /// `segmentCount`, `totalDuration`). Ignored by the other formats.
    pub metadata: Map<String, Value>,

    /// Pin the JSON document's `generatedAt` field.
    ///
    /// When `None`, the current wall-clock time is used. Tests and reproducible
    /// builds set this so output is byte-stable.
    pub generated_at: Option<DateTime<Utc>>,
}

impl ExportOpts {
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

/// Options for pre-flight validation.
#[derive(Debug, Clone)]
pub struct ValidationOpts {
    /// Files larger than this still validate, but carry a size warning.
    pub max_file_bytes: u64,
}

impl Default for ValidationOpts {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}
