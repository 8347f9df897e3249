use pcset::ErrorKind;
use thiserror::Error;

/// Why a chord expression was rejected.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("empty chord expression")]
    Empty,

    #[error("missing closing bracket {close:?} for {open:?} in chord expression")]
    UnclosedBracket { open: char, close: char },

    #[error("chord definition requires at least one element inside brackets")]
    EmptyPayload,

    #[error("mixing absolute and note-only tokens in the same list is not supported")]
    MixedPitchTokens,

    #[error("unrecognized chord token {token:?}")]
    UnrecognizedToken { token: String },

    #[error("chord token {token:?} is out of range")]
    OffsetOutOfRange { token: String },

    #[error("quality {quality:?} invalid for interval number {number}")]
    InvalidIntervalQuality { quality: char, number: u32 },

    #[error("unknown chord quality {name:?}")]
    UnknownQuality { name: String },

    #[error("expected integer token, got {token:?}")]
    ExpectedInteger { token: String },

    #[error(transparent)]
    Pitch(#[from] pcset::Error),
}

impl SpecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpecError::UnknownQuality { .. } => ErrorKind::UnknownCatalogEntry,
            SpecError::OffsetOutOfRange { .. } => ErrorKind::Range,
            SpecError::Pitch(inner) => inner.kind(),
            _ => ErrorKind::Parse,
        }
    }

    /// Pitch-token failures surface as unrecognized chord tokens; range
    /// errors keep their own variant.
    pub(crate) fn from_token(token: &str, err: pcset::Error) -> Self {
        match err {
            pcset::Error::UnrecognizedPitch(_) => SpecError::UnrecognizedToken {
                token: token.to_string(),
            },
            other => SpecError::Pitch(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
