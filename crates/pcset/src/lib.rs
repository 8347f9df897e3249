//! Pitch-class sets and the music-theory objects built on them.
//!
//! Everything here works in 12-tone equal temperament: pitch classes are
//! `u8` values in `0..12`, and a set of pitch classes is a 12-bit [`Mask`].
//! Scales, chord qualities, and chords are immutable values; transposition
//! and registration produce new values rather than mutating old ones.
//!
//! # Example
//!
//! ```
//! use pcset::{Catalog, Chord, Mask};
//!
//! let catalog = Catalog::builtin();
//! let quality = catalog.quality("maj7").unwrap();
//! let chord = Chord::from_quality(2, quality.clone()).unwrap();
//! assert_eq!(chord.pcs, vec![2, 6, 9, 1]);
//!
//! let ionian = catalog.scale("Ionian").unwrap();
//! assert!(!chord.fits_in(ionian));
//! assert_eq!(Mask::from_pcs(&[0, 4, 8]).unwrap().symmetry_order(), 4);
//! ```

pub mod catalog;
pub mod chord;
pub mod mask;
pub mod pitch;
pub mod quality;
pub mod scale;
pub mod session;
pub mod spelling;

pub use catalog::{Catalog, QualityEntry, ScaleEntry};
pub use chord::Chord;
pub use mask::{transpose_pcs, validate_pc, Mask};
pub use pitch::{parse_pitch_token, ParsedPitch, Pitch, Scope};
pub use quality::ChordQuality;
pub use scale::Scale;
pub use session::{
    BuilderContext, ManualChordBuilder, ManualScaleBuilder, PcInput, Registration, SessionOverlay,
};
pub use spelling::{alternate_names, name_for_pc, names_for_pc, pc_from_name, SpellingPref};

use std::path::PathBuf;

/// Pitch class in `0..12` (C = 0).
pub type PitchClass = u8;

/// Errors from pitch-class, pitch, and catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("pitch class out of range: {0}")]
    PitchClassOutOfRange(i64),

    #[error("pitch out of range: {0}")]
    PitchOutOfRange(i64),

    #[error("unrecognized pitch token {0:?}")]
    UnrecognizedPitch(String),

    #[error("invalid mask {0:?}: expected decimal or binary digits")]
    InvalidMaskText(String),

    #[error("{kind} {name:?} must define a non-empty {field} list")]
    EmptyDefinition {
        kind: &'static str,
        name: String,
        field: &'static str,
    },

    #[error("duplicate {kind} name detected: {name}")]
    DuplicateCatalogEntry { kind: &'static str, name: String },

    #[error("unknown {kind} {name:?}")]
    UnknownCatalogEntry { kind: &'static str, name: String },

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification shared by every crate's error type. All of these
/// are input-validation failures; none is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A pitch class or interval outside `0..12` reached a validating constructor.
    Range,
    /// Malformed text.
    Parse,
    UnknownCatalogEntry,
    DuplicateCatalogEntry,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PitchClassOutOfRange(_) | Error::PitchOutOfRange(_) => ErrorKind::Range,
            Error::DuplicateCatalogEntry { .. } => ErrorKind::DuplicateCatalogEntry,
            Error::UnknownCatalogEntry { .. } => ErrorKind::UnknownCatalogEntry,
            Error::UnrecognizedPitch(_)
            | Error::InvalidMaskText(_)
            | Error::EmptyDefinition { .. }
            | Error::Json(_)
            | Error::Io { .. } => ErrorKind::Parse,
        }
    }
}
