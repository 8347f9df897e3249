//! Parsed chord representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use pcset::{name_for_pc, Chord, ChordQuality, Mask, Pitch, PitchClass, Scope, SpellingPref};

/// How a catalog quality relates to a parsed interval set.
///
/// `missing` holds intervals the quality has and the chord lacks; `extra`
/// holds the reverse. Only-missing is a subset, only-extra a superset, both
/// a cousin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityVariant {
    pub name: String,
    pub missing: Vec<PitchClass>,
    pub extra: Vec<PitchClass>,
    pub distance: usize,
}

impl QualityVariant {
    pub fn new(name: impl Into<String>, missing: Vec<PitchClass>, extra: Vec<PitchClass>) -> Self {
        let distance = missing.len() + extra.len();
        Self {
            name: name.into(),
            missing,
            extra,
            distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChordSpec {
    pub label: Option<String>,
    pub scope: Scope,
    /// Sorted, deduplicated, reduced mod 12.
    pub intervals: Vec<PitchClass>,
    pub tokens: Vec<String>,
    pub absolute: Vec<Pitch>,
    pub tensions: Vec<PitchClass>,
    /// Offsets as written: order, duplicates, and register are preserved.
    pub voicing: Vec<i32>,
    pub quality_name: Option<String>,
    pub quality_matches: Vec<String>,
    pub quality_subsets: Vec<QualityVariant>,
    pub quality_supersets: Vec<QualityVariant>,
    pub quality_cousins: Vec<QualityVariant>,
}

/// Sorted unique pitch classes of raw offsets.
pub(crate) fn fold_intervals(offsets: &[i32]) -> Vec<PitchClass> {
    let mask: Mask = offsets
        .iter()
        .map(|&v| v.rem_euclid(12) as PitchClass)
        .collect();
    mask.pcs()
}

impl ChordSpec {
    pub fn absolute_midi(&self) -> Vec<i32> {
        self.absolute.iter().map(|p| p.midi).collect()
    }

    pub fn mask(&self) -> Mask {
        self.intervals.iter().copied().collect()
    }

    /// A quality carrying this spec's intervals, named after the resolved
    /// catalog quality when there is one.
    pub fn to_quality(&self) -> ChordQuality {
        let name = self.quality_name.as_deref().unwrap_or("custom");
        ChordQuality::from_intervals(name, &self.intervals).with_tensions(&self.tensions)
    }
}

/// Everything the parser learned from one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordParse {
    pub spec: ChordSpec,
    pub root_pc: Option<PitchClass>,
    pub root_pitch: Option<Pitch>,
}

impl ChordParse {
    /// Build a chord on the resolved root (C when the expression had none).
    pub fn to_chord(&self) -> pcset::Result<Chord> {
        Chord::from_quality(self.root_pc.unwrap_or(0), self.spec.to_quality())
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Canonical text. Re-parsing it yields the same scope, interval set, and
/// voicing.
impl fmt::Display for ChordParse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = &self.spec;
        let offsets = if spec.voicing.is_empty() {
            join(&spec.intervals)
        } else {
            join(&spec.voicing)
        };
        match spec.scope {
            Scope::Abstract => write!(f, "[{offsets}]")?,
            Scope::Note => {
                let root = name_for_pc(self.root_pc.unwrap_or(0), SpellingPref::Auto, None);
                if spec.voicing.is_empty() && !spec.tokens.is_empty() {
                    write!(f, "{root}[{}]", spec.tokens.join(","))?;
                } else {
                    write!(f, "{root}[{offsets}]")?;
                }
            }
            Scope::Absolute => match self.root_pitch.or_else(|| spec.absolute.first().copied()) {
                Some(root) => write!(f, "{root}{{{}}}", join(&spec.absolute_midi()))?,
                None => write!(f, "[{offsets}]")?,
            },
        }
        if let Some(label) = &spec.label {
            write!(f, "={label}")?;
        }
        Ok(())
    }
}
