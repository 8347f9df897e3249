//! Chord and scale analysis, functional harmony, and chord-scale fit.
//!
//! Everything here is a pure function of a [`pcset::Catalog`] snapshot and
//! its inputs. [`TheoryEngine`] bundles a catalog, a session overlay, and
//! configured defaults for callers that want one handle.
//!
//! # Example
//!
//! ```
//! use harmony::functions::{generate_functions, GenerationOptions, Mode, Tag};
//! use pcset::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let ionian = catalog.scale("Ionian").unwrap();
//! let functions = generate_functions(
//!     ionian,
//!     &catalog,
//!     Mode::Major.templates(),
//!     &GenerationOptions::for_mode(Mode::Major),
//! );
//! let v7 = functions.iter().find(|f| f.modal_label == "V7").unwrap();
//! assert!(v7.has_tag(Tag::DIATONIC));
//! ```

pub mod chord_analysis;
pub mod compare;
pub mod compat;
pub mod engine;
pub mod functions;
pub mod intervals;
pub mod labels;
pub mod scale_analysis;
pub mod summary;
pub mod symmetry;
pub mod tonnetz;
pub mod voicing;

pub use chord_analysis::{analyze_chord, AnalysisOptions, ChordAnalysis};
pub use compare::{compare_chord_qualities, ChordComparison, ScaleChordPlacement};
pub use compat::{compatibility_roots, CompatibilityIndex};
pub use engine::TheoryEngine;
pub use functions::{
    function_mappings, generate_functions, Feature, FeatureSet, GeneratedFunction, GenerationOptions, Mode,
    Role, Tag,
};
pub use labels::IntervalLabelStyle;
pub use scale_analysis::{analyze_scale, ScaleAnalysis, ScaleAnalysisOptions};
pub use summary::{chord_brief, scale_overview, ChordBrief, ScaleOverview};

use pcset::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown scale {name:?}")]
    UnknownScale { name: String },

    #[error("unknown chord quality {name:?}")]
    UnknownQuality { name: String },

    #[error("unknown functional feature {name:?}")]
    UnknownFeature { name: String },

    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error(transparent)]
    Catalog(#[from] pcset::Error),

    #[error(transparent)]
    Spec(#[from] chordspec::SpecError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownScale { .. } | Error::UnknownQuality { .. } => ErrorKind::UnknownCatalogEntry,
            Error::UnknownFeature { .. } | Error::InvalidSetting { .. } => ErrorKind::Parse,
            Error::Catalog(inner) => inner.kind(),
            Error::Spec(inner) => inner.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
