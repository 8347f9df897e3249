//! Placement of pitch classes on the Tonnetz lattice.

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use pcset::PitchClass;

pub type Coordinate = [i32; 3];

/// Generator steps: perfect fifth, major third, minor third.
const GENERATORS: [(u8, Coordinate); 3] = [(7, [1, 0, 0]), (4, [0, 1, 0]), (3, [0, 0, 1])];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TonnetzReport {
    pub coordinates: BTreeMap<PitchClass, Coordinate>,
    /// Mean of the chord's coordinates; `None` for an empty chord.
    pub centroid: Option<[f64; 3]>,
}

/// Breadth-first walk from C assigning each pitch class the first lattice
/// point that reaches it.
pub fn lattice() -> BTreeMap<PitchClass, Coordinate> {
    let mut coords = BTreeMap::from([(0u8, [0, 0, 0])]);
    let mut queue = VecDeque::from([0u8]);
    while coords.len() < 12 {
        let Some(pc) = queue.pop_front() else { break };
        let base = coords[&pc];
        for (step, delta) in GENERATORS {
            let target = (pc + step) % 12;
            if !coords.contains_key(&target) {
                coords.insert(
                    target,
                    [base[0] + delta[0], base[1] + delta[1], base[2] + delta[2]],
                );
                queue.push_back(target);
            }
        }
    }
    coords
}

pub fn tonnetz(pcs: &[PitchClass]) -> TonnetzReport {
    let lattice = lattice();
    let coordinates: BTreeMap<PitchClass, Coordinate> = pcs
        .iter()
        .filter_map(|pc| lattice.get(pc).map(|c| (*pc, *c)))
        .collect();
    if coordinates.is_empty() {
        return TonnetzReport {
            coordinates,
            centroid: None,
        };
    }
    let count = coordinates.len() as f64;
    let mut totals = [0.0f64; 3];
    for coord in coordinates.values() {
        for (total, value) in totals.iter_mut().zip(coord) {
            *total += *value as f64;
        }
    }
    TonnetzReport {
        coordinates,
        centroid: Some(totals.map(|total| total / count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_reaches_every_pitch_class() {
        let lattice = lattice();
        assert_eq!(lattice.len(), 12);
        assert_eq!(lattice[&7], [1, 0, 0]);
        assert_eq!(lattice[&2], [2, 0, 0]);
        assert_eq!(lattice[&11], [1, 1, 0]);
        assert_eq!(lattice[&1], [1, 0, 2]);
    }

    #[test]
    fn major_triad_centroid() {
        let report = tonnetz(&[0, 4, 7]);
        assert_eq!(report.coordinates[&4], [0, 1, 0]);
        let centroid = report.centroid.unwrap();
        assert!((centroid[0] - 1.0 / 3.0).abs() < 1e-9);
        assert!((centroid[1] - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(centroid[2], 0.0);
    }

    #[test]
    fn empty_chord_has_no_centroid() {
        assert_eq!(tonnetz(&[]).centroid, None);
    }
}
