//! Chord-expression parser.
//!
//! This crate turns compact chord text into a [`ChordSpec`]: an interval set
//! plus the voicing, tokens, and root it was written with, annotated against
//! a quality [`Catalog`](pcset::Catalog).
//!
//! Accepted forms:
//!
//! - `maj7`: a catalog quality name
//! - `C:maj7`, `C3:min`: a root and a quality
//! - `[0,4,7]`, `[P1,M3,P5]`, `[1,b3,5]`, `[C,E,G]`: bracketed lists
//! - `(1,b3,5,b7)`: scale degrees
//! - `{48,52,55}`: absolute MIDI numbers
//!
//! Any form may carry a root prefix (`D[0,4,7]`) and an alias suffix
//! (`[0,4,7]=triad`).
//!
//! # Example
//!
//! ```
//! use chordspec::parse;
//! use pcset::{Catalog, Scope};
//!
//! let catalog = Catalog::builtin();
//! let parsed = parse("C3[0,4,7]=home", &catalog).unwrap();
//! assert_eq!(parsed.spec.scope, Scope::Absolute);
//! assert_eq!(parsed.spec.absolute_midi(), vec![48, 52, 55]);
//! assert_eq!(parsed.spec.quality_name.as_deref(), Some("maj"));
//! assert_eq!(parsed.to_string(), "C3{48,52,55}=home");
//! ```

pub mod annotate;
pub mod error;
pub mod parser;
pub mod spec;

pub use annotate::{classify, Classification, VARIANT_LIMIT};
pub use error::{Result, SpecError};
pub use spec::{ChordParse, ChordSpec, QualityVariant};

use pcset::Catalog;

/// Parse a chord expression, resolving quality names against `catalog`.
///
/// The result is always annotated with the catalog's exact, subset,
/// superset, and cousin qualities unless the catalog holds no qualities.
pub fn parse(text: &str, catalog: &Catalog) -> Result<ChordParse> {
    parser::parse(text, catalog)
}
