//! Rotational and reflectional symmetry of pitch-class sets.

use serde::Serialize;

use pcset::{Mask, PitchClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// The axis passes through a pitch class.
    Pitch,
    /// The axis falls halfway between two adjacent pitch classes.
    Between,
}

/// A mirror line on the pitch-class clock. `center` is in semitones,
/// with half-steps for [`AxisKind::Between`] axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflectionAxis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub center: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symmetry {
    /// 0 for the empty set.
    pub rotational_order: u8,
    /// Non-trivial rotations that map the set onto itself, `[12]` if none.
    pub rotational_steps: Vec<u8>,
    pub achiral: bool,
    pub reflection_axes: Vec<ReflectionAxis>,
}

impl Symmetry {
    fn empty() -> Self {
        Self {
            rotational_order: 0,
            rotational_steps: Vec::new(),
            achiral: false,
            reflection_axes: Vec::new(),
        }
    }
}

fn reflect(mask: Mask, sum: u8) -> Mask {
    mask.pcs()
        .into_iter()
        .map(|pc| (sum + 24 - pc) % 12)
        .collect()
}

/// Every axis, through or between pitch classes, whose mirror image
/// reproduces `mask`. Centers `a` and `a + 6` name the same line and are
/// both reported.
pub fn reflection_axes(mask: Mask) -> Vec<ReflectionAxis> {
    if mask.is_empty() {
        return Vec::new();
    }
    let mut axes = Vec::new();
    for axis in 0..12u8 {
        if reflect(mask, 2 * axis) == mask {
            axes.push(ReflectionAxis {
                kind: AxisKind::Pitch,
                center: axis as f64,
            });
        }
        if reflect(mask, 2 * axis + 1) == mask {
            axes.push(ReflectionAxis {
                kind: AxisKind::Between,
                center: (axis as f64 + 0.5) % 12.0,
            });
        }
    }
    axes
}

fn rotational_steps(mask: Mask) -> Vec<u8> {
    let steps = mask.rotational_steps();
    if steps.is_empty() {
        vec![12]
    } else {
        steps
    }
}

/// Symmetry of a chord's pitch-class set. Achiral iff some reflection axis
/// exists.
pub fn set_symmetry(mask: Mask) -> Symmetry {
    if mask.is_empty() {
        return Symmetry::empty();
    }
    let reflection_axes = reflection_axes(mask);
    Symmetry {
        rotational_order: mask.symmetry_order(),
        rotational_steps: rotational_steps(mask),
        achiral: !reflection_axes.is_empty(),
        reflection_axes,
    }
}

/// True when some rotation of the reversed step cycle equals the cycle.
pub fn step_pattern_is_achiral(steps: &[u8]) -> bool {
    let reversed: Vec<u8> = steps.iter().rev().copied().collect();
    (0..steps.len()).any(|shift| {
        reversed[shift..]
            .iter()
            .chain(&reversed[..shift])
            .eq(steps.iter())
    })
}

/// Symmetry of a scale, judging chirality from its step pattern.
pub fn scale_symmetry(mask: Mask, steps: &[u8]) -> Symmetry {
    if steps.is_empty() {
        return Symmetry::empty();
    }
    Symmetry {
        rotational_order: mask.symmetry_order(),
        rotational_steps: rotational_steps(mask),
        achiral: step_pattern_is_achiral(steps),
        reflection_axes: reflection_axes(mask),
    }
}

/// Convenience for callers holding raw pitch classes.
pub fn pcs_symmetry(pcs: &[PitchClass]) -> Symmetry {
    set_symmetry(pcs.iter().map(|&pc| pc % 12).collect())
}
