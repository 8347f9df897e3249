use serde::{Deserialize, Serialize};

use crate::mask::Mask;
use crate::{PitchClass, Result};

/// A chord shape as intervals above a root, independent of any root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordQuality {
    pub name: String,
    pub intervals: Vec<PitchClass>,
    #[serde(default)]
    pub tensions: Vec<PitchClass>,
    pub mask: Mask,
}

fn normalize<T: Copy + Into<i64>>(values: &[T]) -> Mask {
    values
        .iter()
        .map(|&v| v.into().rem_euclid(12) as PitchClass)
        .collect()
}

impl ChordQuality {
    /// Folding constructor: intervals are reduced mod 12, deduplicated,
    /// and sorted, so compound intervals such as 14 become 2. Use
    /// [`ChordQuality::try_from_intervals`] to reject them instead.
    pub fn from_intervals<T: Copy + Into<i64>>(name: impl Into<String>, intervals: &[T]) -> Self {
        Self::from_mask(name, normalize(intervals))
    }

    /// Like [`ChordQuality::from_intervals`], but any value outside `0..12`
    /// is a [`crate::Error::PitchClassOutOfRange`].
    pub fn try_from_intervals<T: Copy + Into<i64>>(name: impl Into<String>, intervals: &[T]) -> Result<Self> {
        Ok(Self::from_mask(name, Mask::from_pcs(intervals)?))
    }

    fn from_mask(name: impl Into<String>, mask: Mask) -> Self {
        Self {
            name: name.into(),
            intervals: mask.pcs(),
            tensions: Vec::new(),
            mask,
        }
    }

    pub fn with_tensions<T: Copy + Into<i64>>(mut self, tensions: &[T]) -> Self {
        self.tensions = normalize(tensions).pcs();
        self
    }

    /// Chord tones above `root_pc`, in interval order.
    pub fn pcs_from_root(&self, root_pc: PitchClass) -> Vec<PitchClass> {
        self.intervals
            .iter()
            .map(|&iv| (root_pc + iv) % 12)
            .collect()
    }

    /// Mask of the chord built on `root_pc`.
    pub fn mask_at(&self, root_pc: PitchClass) -> Mask {
        self.mask.rotate(root_pc as i32)
    }
}
