use serde::{Deserialize, Serialize};

use crate::mask::{validate_pc, Mask};
use crate::quality::ChordQuality;
use crate::scale::Scale;
use crate::spelling::{name_for_pc, SpellingPref};
use crate::{PitchClass, Result};

/// A quality rooted on a pitch class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub root_pc: PitchClass,
    pub quality: ChordQuality,
    /// Chord tones in the quality's interval order.
    pub pcs: Vec<PitchClass>,
    pub mask: Mask,
}

impl Chord {
    pub fn from_quality<T: Into<i64>>(root_pc: T, quality: ChordQuality) -> Result<Self> {
        let root_pc = validate_pc(root_pc)?;
        let pcs = quality.pcs_from_root(root_pc);
        let mask = pcs.iter().copied().collect();
        Ok(Self {
            root_pc,
            quality,
            pcs,
            mask,
        })
    }

    pub fn spelled(&self, prefer: SpellingPref, key_signature: Option<i8>) -> Vec<&'static str> {
        self.pcs
            .iter()
            .map(|&pc| name_for_pc(pc, prefer, key_signature))
            .collect()
    }

    /// True iff every chord tone lies in `scale` (scale rooted on C).
    pub fn fits_in(&self, scale: &Scale) -> bool {
        self.mask.is_subset_of(scale.mask)
    }

    /// Label each chord tone with its 1-based position in `scale_degrees`
    /// measured from `scale_root`, or `"(out)"` when it isn't a degree.
    pub fn degree_labels(
        &self,
        scale_root: PitchClass,
        scale_degrees: &[PitchClass],
    ) -> Vec<(&'static str, String)> {
        self.pcs
            .iter()
            .map(|&pc| {
                let relative = (pc + 12 - scale_root % 12) % 12;
                let label = scale_degrees
                    .iter()
                    .position(|&d| d == relative)
                    .map(|idx| (idx + 1).to_string())
                    .unwrap_or_else(|| "(out)".to_string());
                (name_for_pc(pc, SpellingPref::Auto, None), label)
            })
            .collect()
    }

    /// Root name followed by the quality name, e.g. `"Dmaj7"`.
    pub fn symbol(&self, prefer: SpellingPref, key_signature: Option<i8>) -> String {
        format!(
            "{}{}",
            name_for_pc(self.root_pc, prefer, key_signature),
            self.quality.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn dom7() -> ChordQuality {
        ChordQuality::from_intervals("7", &[0, 4, 7, 10])
    }

    #[test]
    fn rejects_out_of_range_root() {
        assert!(matches!(
            Chord::from_quality(12, dom7()),
            Err(Error::PitchClassOutOfRange(12))
        ));
    }

    #[test]
    fn builds_pcs_and_mask() {
        let g7 = Chord::from_quality(7, dom7()).unwrap();
        assert_eq!(g7.pcs, vec![7, 11, 2, 5]);
        assert_eq!(g7.mask.pcs(), vec![2, 5, 7, 11]);
        assert_eq!(g7.symbol(SpellingPref::Auto, None), "G7");
    }

    #[test]
    fn spelling_follows_key_signature() {
        let bb7 = Chord::from_quality(10, dom7()).unwrap();
        assert_eq!(bb7.spelled(SpellingPref::Auto, Some(-2)), vec!["Bb", "D", "F", "Ab"]);
        assert_eq!(bb7.spelled(SpellingPref::Sharps, None), vec!["A#", "D", "F", "G#"]);
    }

    #[test]
    fn fits_in_scale() {
        let ionian = Scale::from_degrees("Ionian", &[0, 2, 4, 5, 7, 9, 11]);
        assert!(Chord::from_quality(7, dom7()).unwrap().fits_in(&ionian));
        assert!(!Chord::from_quality(2, dom7()).unwrap().fits_in(&ionian));
    }

    #[test]
    fn degree_labels_mark_outside_tones() {
        let ionian = [0, 2, 4, 5, 7, 9, 11];
        let d7 = Chord::from_quality(2, dom7()).unwrap();
        let labels = d7.degree_labels(0, &ionian);
        assert_eq!(
            labels,
            vec![
                ("D", "2".to_string()),
                ("F#", "(out)".to_string()),
                ("A", "6".to_string()),
                ("C", "1".to_string()),
            ]
        );
    }
}
