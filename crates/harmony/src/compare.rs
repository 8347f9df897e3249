//! Side-by-side comparison of two chord qualities across a scale catalog.

use serde::Serialize;
use std::collections::BTreeMap;

use pcset::{ChordQuality, PitchClass, Scale};

use crate::compat::CompatibilityIndex;
use crate::summary::interval_fingerprint;

const ROMANS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Label each pitch class by its position among the scale's degrees:
/// roman numerals for the first seven, then 1-based numbers, `"(out)"` for
/// pitch classes outside the scale.
pub fn degree_labels(scale: &Scale, pcs: &[PitchClass]) -> Vec<String> {
    pcs.iter()
        .map(|pc| match scale.degrees.iter().position(|d| d == pc) {
            Some(idx) => ROMANS
                .get(idx)
                .map(|r| r.to_string())
                .unwrap_or_else(|| (idx + 1).to_string()),
            None => "(out)".to_string(),
        })
        .collect()
}

/// A scale that holds both qualities somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleChordPlacement {
    pub scale: String,
    pub roots_a: Vec<PitchClass>,
    pub roots_b: Vec<PitchClass>,
    pub shared_roots: Vec<PitchClass>,
    pub degree_map_a: BTreeMap<PitchClass, Vec<String>>,
    pub degree_map_b: BTreeMap<PitchClass, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordComparison {
    pub quality_a: String,
    pub quality_b: String,
    pub interval_fingerprint_a: String,
    pub interval_fingerprint_b: String,
    pub intervals_only_a: Vec<PitchClass>,
    pub intervals_only_b: Vec<PitchClass>,
    pub shared_scales: Vec<ScaleChordPlacement>,
    pub unique_to_a: Vec<String>,
    pub unique_to_b: Vec<String>,
}

fn degree_map(scale: &Scale, quality: &ChordQuality, roots: &[PitchClass]) -> BTreeMap<PitchClass, Vec<String>> {
    roots
        .iter()
        .map(|&root| (root, degree_labels(scale, &quality.pcs_from_root(root))))
        .collect()
}

fn difference(left: &[PitchClass], right: &[PitchClass]) -> Vec<PitchClass> {
    left.iter().filter(|iv| !right.contains(iv)).copied().collect()
}

/// Compare two qualities over `scales`, visited by name.
///
/// With `include`, only the named scales take part. Any scale named
/// "chromatic" (in any case) is skipped.
pub fn compare_chord_qualities<'a, I>(
    quality_a: &ChordQuality,
    quality_b: &ChordQuality,
    scales: I,
    include: Option<&[&str]>,
    index: &CompatibilityIndex,
) -> ChordComparison
where
    I: IntoIterator<Item = &'a Scale>,
{
    let mut scales: Vec<&Scale> = scales
        .into_iter()
        .filter(|s| include.map_or(true, |names| names.contains(&s.name.as_str())))
        .filter(|s| !s.name.eq_ignore_ascii_case("chromatic"))
        .collect();
    scales.sort_by(|a, b| a.name.cmp(&b.name));

    let mut shared_scales = Vec::new();
    let mut unique_to_a = Vec::new();
    let mut unique_to_b = Vec::new();

    for scale in scales {
        let roots_a = index.roots(quality_a, scale);
        let roots_b = index.roots(quality_b, scale);
        match (roots_a.is_empty(), roots_b.is_empty()) {
            (false, false) => shared_scales.push(ScaleChordPlacement {
                scale: scale.name.clone(),
                shared_roots: roots_a.iter().filter(|r| roots_b.contains(r)).copied().collect(),
                degree_map_a: degree_map(scale, quality_a, &roots_a),
                degree_map_b: degree_map(scale, quality_b, &roots_b),
                roots_a,
                roots_b,
            }),
            (false, true) => unique_to_a.push(scale.name.clone()),
            (true, false) => unique_to_b.push(scale.name.clone()),
            (true, true) => {}
        }
    }

    ChordComparison {
        quality_a: quality_a.name.clone(),
        quality_b: quality_b.name.clone(),
        interval_fingerprint_a: interval_fingerprint(quality_a),
        interval_fingerprint_b: interval_fingerprint(quality_b),
        intervals_only_a: difference(&quality_a.intervals, &quality_b.intervals),
        intervals_only_b: difference(&quality_b.intervals, &quality_a.intervals),
        shared_scales,
        unique_to_a,
        unique_to_b,
    }
}
