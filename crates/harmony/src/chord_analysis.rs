//! Chord analysis reports.
//!
//! [`analyze_chord`] is total: any constructed [`Chord`] produces a report.
//! Sections the caller switches off in [`AnalysisOptions`] come back as
//! `None`.

use serde::Serialize;
use std::collections::BTreeMap;

use pcset::{alternate_names, name_for_pc, Chord, Mask, PitchClass, SpellingPref};

use crate::intervals::{
    interval_class_histogram, interval_matrix, interval_summary, interval_vector, invert_matrix,
    label_histogram, IntervalSummary,
};
use crate::labels::{label_interval, label_matrix, IntervalLabelStyle};
use crate::symmetry::{set_symmetry, Symmetry};
use crate::tonnetz::{tonnetz, TonnetzReport};
use crate::voicing::{generate_inversions, generate_voicings, Inversion, VoicingSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Adds a [`TonicContext`] section when set.
    pub tonic_pc: Option<PitchClass>,
    pub prefer: SpellingPref,
    pub key_signature: Option<i8>,
    pub include_inversions: bool,
    pub include_voicings: bool,
    pub include_enharmonics: bool,
    pub interval_labels: IntervalLabelStyle,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            tonic_pc: None,
            prefer: SpellingPref::Auto,
            key_signature: None,
            include_inversions: true,
            include_voicings: true,
            include_enharmonics: true,
            interval_labels: IntervalLabelStyle::Numeric,
        }
    }
}

impl AnalysisOptions {
    pub fn with_tonic(mut self, tonic_pc: PitchClass) -> Self {
        self.tonic_pc = Some(tonic_pc % 12);
        self
    }

    pub fn with_labels(mut self, style: IntervalLabelStyle) -> Self {
        self.interval_labels = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TonicRelativeNote {
    pub note: String,
    pub relative_pc: PitchClass,
    pub relative_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TonicContext {
    pub tonic_pc: PitchClass,
    pub root_interval_from_tonic: u8,
    pub root_interval_label: String,
    pub note_names_relative_to_tonic: Vec<TonicRelativeNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnharmonicSpelling {
    pub pc: PitchClass,
    pub preferred: String,
    pub alternates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordAnalysis {
    pub root_pc: PitchClass,
    pub quality: String,
    pub pcs: Vec<PitchClass>,
    pub mask: Mask,
    pub cardinality: usize,
    pub intervals_relative_to_root: Vec<u8>,

    pub interval_matrix: Vec<Vec<u8>>,
    pub interval_matrix_labels: Vec<Vec<String>>,
    pub interval_class_histogram: Vec<(String, usize)>,
    pub interval_class_histogram_numeric: BTreeMap<u8, usize>,

    /// Octave complements of [`Self::interval_matrix`].
    pub inverted_interval_matrix: Vec<Vec<u8>>,
    pub inverted_interval_matrix_labels: Vec<Vec<String>>,
    pub inverted_interval_class_histogram: Vec<(String, usize)>,
    pub inverted_interval_class_histogram_numeric: BTreeMap<u8, usize>,

    pub interval_vector: [usize; 6],
    pub interval_summary: IntervalSummary,
    pub symmetry: Symmetry,
    pub tonnetz: TonnetzReport,
    pub note_names: Vec<String>,

    pub tonic_context: Option<TonicContext>,
    pub inversions: Option<Vec<Inversion>>,
    pub voicings: Option<VoicingSet>,
    pub enharmonics: Option<Vec<EnharmonicSpelling>>,
}

fn tonic_context(chord: &Chord, tonic_pc: PitchClass, options: &AnalysisOptions) -> TonicContext {
    let tonic_pc = tonic_pc % 12;
    let root_interval = (chord.root_pc + 12 - tonic_pc) % 12;
    TonicContext {
        tonic_pc,
        root_interval_from_tonic: root_interval,
        root_interval_label: label_interval(root_interval as i32, options.interval_labels),
        note_names_relative_to_tonic: chord
            .pcs
            .iter()
            .map(|&pc| {
                let relative_pc = (pc + 12 - tonic_pc) % 12;
                TonicRelativeNote {
                    note: name_for_pc(pc, options.prefer, options.key_signature).to_string(),
                    relative_pc,
                    relative_label: label_interval(relative_pc as i32, options.interval_labels),
                }
            })
            .collect(),
    }
}

/// Preferred and alternate names for each distinct pitch class, in chord
/// order.
pub fn enharmonic_spellings(
    pcs: &[PitchClass],
    prefer: SpellingPref,
    key_signature: Option<i8>,
) -> Vec<EnharmonicSpelling> {
    let mut seen = Mask::EMPTY;
    let mut spellings = Vec::new();
    for &pc in pcs {
        if seen.contains(pc) {
            continue;
        }
        seen = seen | Mask::from_bits(1 << pc);
        let preferred = name_for_pc(pc, prefer, key_signature);
        spellings.push(EnharmonicSpelling {
            pc,
            preferred: preferred.to_string(),
            alternates: alternate_names(pc, preferred)
                .into_iter()
                .map(str::to_string)
                .collect(),
        });
    }
    spellings
}

pub fn analyze_chord(chord: &Chord, options: &AnalysisOptions) -> ChordAnalysis {
    let style = options.interval_labels;
    let pcs = chord.pcs.clone();

    let matrix = interval_matrix(&pcs);
    let inverted = invert_matrix(&matrix);
    let histogram = interval_class_histogram(&matrix);
    let inverted_histogram = interval_class_histogram(&inverted);

    ChordAnalysis {
        root_pc: chord.root_pc,
        quality: chord.quality.name.clone(),
        mask: chord.mask,
        cardinality: pcs.len(),
        intervals_relative_to_root: pcs
            .iter()
            .map(|&pc| (pc + 12 - chord.root_pc) % 12)
            .collect(),

        interval_matrix_labels: label_matrix(&matrix, style),
        interval_class_histogram: label_histogram(&histogram, style),
        interval_class_histogram_numeric: histogram,
        interval_matrix: matrix,

        inverted_interval_matrix_labels: label_matrix(&inverted, style),
        inverted_interval_class_histogram: label_histogram(&inverted_histogram, style),
        inverted_interval_class_histogram_numeric: inverted_histogram,
        inverted_interval_matrix: inverted,

        interval_vector: interval_vector(&pcs),
        interval_summary: interval_summary(&pcs),
        symmetry: set_symmetry(chord.mask),
        tonnetz: tonnetz(&pcs),
        note_names: chord
            .spelled(options.prefer, options.key_signature)
            .into_iter()
            .map(str::to_string)
            .collect(),

        tonic_context: options
            .tonic_pc
            .map(|tonic| tonic_context(chord, tonic, options)),
        inversions: options
            .include_inversions
            .then(|| generate_inversions(chord, options.prefer, options.key_signature, style)),
        voicings: options
            .include_voicings
            .then(|| generate_voicings(chord, options.prefer, options.key_signature)),
        enharmonics: options
            .include_enharmonics
            .then(|| enharmonic_spellings(&pcs, options.prefer, options.key_signature)),
        pcs,
    }
}
