use std::error::Error as StdError;

use thiserror::Error;

/// segment-export's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// segment-export's crate-wide error type.
///
/// Only structural failures surface here. Validation outcomes are reported through
/// [`crate::validation::ValidationResult`] and never as an `Err`.
#[derive(Debug, Error)]
pub enum Error {
    /// The segment list was not a JSON array (including `null`).
    #[error("segments must be a sequence, got {found}")]
    NotASequence { found: &'static str },

    /// A single segment failed the structural check.
    #[error("invalid segment at index {index}: {reason}")]
    InvalidSegment { index: usize, reason: String },

    /// A write was attempted after the encoder was finalized.
    #[error("cannot write segment: encoder is already closed")]
    EncoderClosed,

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn invalid_segment(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            index,
            reason: reason.into(),
        }
    }

    /// The 0-based index of the offending segment, when the error names one.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::InvalidSegment { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Other(Box::new(err))
    }
}
