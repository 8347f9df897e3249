//! Chord inversions and register voicings.

use serde::Serialize;

use pcset::{name_for_pc, Chord, PitchClass, SpellingPref};

use crate::labels::{label_interval, IntervalLabelStyle};

/// Sort, then lift each value by octaves until it sits above its
/// predecessor, giving a strictly ascending stack.
pub fn normalize_register(values: &[i32]) -> Vec<i32> {
    let mut ordered = values.to_vec();
    ordered.sort_unstable();
    let mut stacked: Vec<i32> = Vec::with_capacity(ordered.len());
    for value in ordered {
        let mut next = value;
        if let Some(&prev) = stacked.last() {
            while next <= prev {
                next += 12;
            }
        }
        stacked.push(next);
    }
    stacked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inversion {
    pub root_pc: PitchClass,
    pub intervals: Vec<u8>,
    pub interval_labels: Vec<String>,
    pub note_names: Vec<String>,
}

/// One inversion per chord tone, rotating the tone order so that tone
/// comes first.
pub fn generate_inversions(
    chord: &Chord,
    prefer: SpellingPref,
    key_signature: Option<i8>,
    style: IntervalLabelStyle,
) -> Vec<Inversion> {
    let pcs = &chord.pcs;
    (0..pcs.len())
        .map(|idx| {
            let root_pc = pcs[idx];
            let rotated: Vec<PitchClass> = pcs[idx..].iter().chain(&pcs[..idx]).copied().collect();
            let intervals: Vec<u8> = rotated.iter().map(|&pc| (pc + 12 - root_pc) % 12).collect();
            Inversion {
                root_pc,
                interval_labels: intervals
                    .iter()
                    .map(|&iv| label_interval(iv as i32, style))
                    .collect(),
                note_names: rotated
                    .iter()
                    .map(|&pc| name_for_pc(pc, prefer, key_signature).to_string())
                    .collect(),
                intervals,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voicing {
    pub label: String,
    pub semitones_from_root: Vec<i32>,
    pub intervals_mod_12: Vec<u8>,
    /// Lowest to highest voice, in semitones.
    pub spread: i32,
    pub note_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoicingSet {
    pub closed: Voicing,
    /// Second voice from the top dropped an octave. Four or more notes.
    pub drop2: Option<Voicing>,
    /// Third voice from the top dropped an octave. Five or more notes.
    pub drop3: Option<Voicing>,
}

fn make_voicing(
    label: &str,
    semitones: &[i32],
    root_pc: PitchClass,
    prefer: SpellingPref,
    key_signature: Option<i8>,
) -> Voicing {
    let ordered = normalize_register(semitones);
    let spread = match (ordered.first(), ordered.last()) {
        (Some(lo), Some(hi)) if ordered.len() > 1 => hi - lo,
        _ => 0,
    };
    Voicing {
        label: label.to_string(),
        intervals_mod_12: ordered.iter().map(|iv| iv.rem_euclid(12) as u8).collect(),
        note_names: ordered
            .iter()
            .map(|iv| {
                let pc = (root_pc as i32 + iv).rem_euclid(12) as PitchClass;
                name_for_pc(pc, prefer, key_signature).to_string()
            })
            .collect(),
        semitones_from_root: ordered,
        spread,
    }
}

fn dropped(closed: &[i32], from_top: usize) -> Option<Vec<i32>> {
    if closed.len() < from_top + 2 {
        return None;
    }
    let mut voices = closed.to_vec();
    let idx = voices.len() - from_top;
    voices[idx] -= 12;
    Some(voices)
}

pub fn generate_voicings(chord: &Chord, prefer: SpellingPref, key_signature: Option<i8>) -> VoicingSet {
    let mut relative: Vec<i32> = chord
        .pcs
        .iter()
        .map(|&pc| ((pc + 12 - chord.root_pc) % 12) as i32)
        .collect();
    relative.sort_unstable();
    let closed = normalize_register(&relative);
    let voice = |label: &str, semitones: &[i32]| {
        make_voicing(label, semitones, chord.root_pc, prefer, key_signature)
    };

    VoicingSet {
        drop2: dropped(&closed, 2).map(|v| voice("drop2", &v)),
        drop3: dropped(&closed, 3).map(|v| voice("drop3", &v)),
        closed: voice("closed", &closed),
    }
}
