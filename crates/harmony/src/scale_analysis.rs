//! Scale analysis: step patterns, modes, symmetry, and interval content.

use serde::Serialize;
use std::collections::BTreeMap;

use pcset::{name_for_pc, Mask, PitchClass, Scale, SpellingPref};

use crate::intervals::interval_vector;
use crate::symmetry::{scale_symmetry, Symmetry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleAnalysisOptions {
    /// Note names are only produced when a tonic is given.
    pub tonic_pc: Option<PitchClass>,
    pub prefer: SpellingPref,
    pub key_signature: Option<i8>,
    pub include_modes: bool,
    pub include_symmetry: bool,
    pub include_interval_report: bool,
    pub include_note_names: bool,
}

impl Default for ScaleAnalysisOptions {
    fn default() -> Self {
        Self {
            tonic_pc: None,
            prefer: SpellingPref::Auto,
            key_signature: None,
            include_modes: true,
            include_symmetry: true,
            include_interval_report: true,
            include_note_names: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalRotation {
    pub mode_index: usize,
    pub root_pc: PitchClass,
    pub degrees: Vec<PitchClass>,
    pub mask: Mask,
    pub step_pattern: Vec<u8>,
    pub interval_vector: [usize; 6],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleIntervalSummary {
    /// Number of steps, which is the number of degrees.
    pub cardinality: usize,
    pub interval_vector: [usize; 6],
    pub largest_step: Option<u8>,
    pub smallest_step: Option<u8>,
    pub semitone_count: usize,
    pub tone_count: usize,
    pub tritone_pairs: usize,
    /// Interval class (`"1"`..`"6"`) to count.
    pub ic_map: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleAnalysis {
    pub scale_name: String,
    pub degrees: Vec<PitchClass>,
    pub cardinality: usize,
    pub step_pattern: Vec<u8>,
    pub interval_vector: [usize; 6],
    pub mask: Mask,
    pub mask_binary: String,
    pub note_names: Option<Vec<String>>,
    pub modes: Option<Vec<ModalRotation>>,
    pub symmetry: Option<Symmetry>,
    pub intervals: Option<ScaleIntervalSummary>,
}

/// Distances between successive degrees, closing with the wrap back to
/// the first. A single-degree scale has the step pattern `[12]`.
pub fn step_pattern(degrees: &[PitchClass]) -> Vec<u8> {
    let ordered: Mask = degrees.iter().map(|&pc| pc % 12).collect();
    let ordered = ordered.pcs();
    let n = ordered.len();
    (0..n)
        .map(|idx| {
            let step = (ordered[(idx + 1) % n] + 12 - ordered[idx]) % 12;
            if step == 0 {
                12
            } else {
                step
            }
        })
        .collect()
}

/// Every mode of the scale, one per degree, each re-rooted on 0.
pub fn modal_rotations(scale: &Scale) -> Vec<ModalRotation> {
    scale
        .degrees
        .iter()
        .enumerate()
        .map(|(mode_index, &root)| {
            let mask = scale.mask.rotate(-(root as i32));
            let degrees = mask.pcs();
            ModalRotation {
                mode_index,
                root_pc: root,
                step_pattern: step_pattern(&degrees),
                interval_vector: interval_vector(&degrees),
                degrees,
                mask,
            }
        })
        .collect()
}

fn interval_report(steps: &[u8], vector: [usize; 6]) -> ScaleIntervalSummary {
    let count = |size: u8| steps.iter().filter(|&&s| s == size).count();
    ScaleIntervalSummary {
        cardinality: steps.len(),
        interval_vector: vector,
        largest_step: steps.iter().copied().max(),
        smallest_step: steps.iter().copied().min(),
        semitone_count: count(1),
        tone_count: count(2),
        tritone_pairs: vector[5],
        ic_map: vector
            .iter()
            .enumerate()
            .map(|(idx, &n)| ((idx + 1).to_string(), n))
            .collect(),
    }
}

pub fn analyze_scale(scale: &Scale, options: &ScaleAnalysisOptions) -> ScaleAnalysis {
    let steps = step_pattern(&scale.degrees);
    let vector = interval_vector(&scale.degrees);

    let note_names = match options.tonic_pc {
        Some(tonic) if options.include_note_names => Some(
            scale
                .degrees
                .iter()
                .map(|&deg| name_for_pc((tonic + deg) % 12, options.prefer, options.key_signature).to_string())
                .collect(),
        ),
        _ => None,
    };

    ScaleAnalysis {
        scale_name: scale.name.clone(),
        degrees: scale.degrees.clone(),
        cardinality: scale.degrees.len(),
        mask: scale.mask,
        mask_binary: scale.mask.to_binary_string(),
        note_names,
        modes: options.include_modes.then(|| modal_rotations(scale)),
        symmetry: options
            .include_symmetry
            .then(|| scale_symmetry(scale.mask, &steps)),
        intervals: options
            .include_interval_report
            .then(|| interval_report(&steps, vector)),
        interval_vector: vector,
        step_pattern: steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcset::Catalog;

    #[test]
    fn ionian_steps_and_modes() {
        let catalog = Catalog::builtin();
        let ionian = catalog.scale("Ionian").unwrap();
        let report = analyze_scale(ionian, &ScaleAnalysisOptions::default());
        assert_eq!(report.step_pattern, vec![2, 2, 1, 2, 2, 2, 1]);
        assert_eq!(report.interval_vector, [2, 5, 4, 3, 6, 1]);
        assert_eq!(report.mask_binary, "101011010101");
        assert!(report.note_names.is_none());

        let modes = report.modes.unwrap();
        assert_eq!(modes.len(), 7);
        // second mode is Dorian
        assert_eq!(modes[1].root_pc, 2);
        assert_eq!(modes[1].degrees, vec![0, 2, 3, 5, 7, 9, 10]);
        assert_eq!(modes[1].step_pattern, vec![2, 1, 2, 2, 2, 1, 2]);
    }

    #[test]
    fn interval_report_counts_steps() {
        let ionian = Scale::from_degrees("Ionian", &[0, 2, 4, 5, 7, 9, 11]);
        let intervals = analyze_scale(&ionian, &ScaleAnalysisOptions::default())
            .intervals
            .unwrap();
        assert_eq!(intervals.semitone_count, 2);
        assert_eq!(intervals.tone_count, 5);
        assert_eq!(intervals.tritone_pairs, 1);
        assert_eq!(intervals.largest_step, Some(2));
        assert_eq!(intervals.ic_map["5"], 6);
    }

    #[test]
    fn whole_tone_symmetry() {
        let whole = Scale::from_degrees("Whole Tone", &[0, 2, 4, 6, 8, 10]);
        let symmetry = analyze_scale(&whole, &ScaleAnalysisOptions::default())
            .symmetry
            .unwrap();
        assert_eq!(symmetry.rotational_order, 2);
        assert_eq!(symmetry.rotational_steps, vec![2, 4, 6, 8, 10]);
        assert!(symmetry.achiral);
    }

    #[test]
    fn note_names_need_a_tonic() {
        let options = ScaleAnalysisOptions {
            tonic_pc: Some(2),
            prefer: SpellingPref::Sharps,
            ..ScaleAnalysisOptions::default()
        };
        let ionian = Scale::from_degrees("Ionian", &[0, 2, 4, 5, 7, 9, 11]);
        let names = analyze_scale(&ionian, &options).note_names.unwrap();
        assert_eq!(names, vec!["D", "E", "F#", "G", "A", "B", "C#"]);
    }

    #[test]
    fn degenerate_step_patterns() {
        assert_eq!(step_pattern(&[]), Vec::<u8>::new());
        assert_eq!(step_pattern(&[5]), vec![12]);
        assert_eq!(step_pattern(&[0, 6]), vec![6, 6]);
    }
}
