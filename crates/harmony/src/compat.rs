use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pcset::{ChordQuality, Mask, PitchClass, Scale};

/// Roots (0..12) on which `quality` lies entirely inside `scale`.
pub fn compatibility_roots(quality: &ChordQuality, scale: &Scale) -> Vec<PitchClass> {
    roots_for_masks(quality.mask, scale.mask)
}

fn roots_for_masks(quality: Mask, scale: Mask) -> Vec<PitchClass> {
    (0..12u8)
        .filter(|&root| quality.rotate(root as i32).is_subset_of(scale))
        .collect()
}

/// Memoized [`compatibility_roots`], keyed by `(scale mask, quality mask)`.
///
/// Results depend only on the masks, so entries never go stale and
/// renamed or session-registered entries with the same content share them.
#[derive(Debug, Default)]
pub struct CompatibilityIndex {
    roots: Mutex<HashMap<(Mask, Mask), Vec<PitchClass>>>,
}

impl CompatibilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are plain values, a panic mid-insert leaves nothing half-written.
    fn entries(&self) -> MutexGuard<'_, HashMap<(Mask, Mask), Vec<PitchClass>>> {
        self.roots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn roots(&self, quality: &ChordQuality, scale: &Scale) -> Vec<PitchClass> {
        self.entries()
            .entry((scale.mask, quality.mask))
            .or_insert_with(|| roots_for_masks(quality.mask, scale.mask))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}
