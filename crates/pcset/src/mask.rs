//! 12-bit pitch-class set masks.
//!
//! Bit `i` is set iff pitch class `i` is present. All operations are total
//! and side-effect free; only the validating constructors can fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::{Error, PitchClass, Result};

const FULL: u16 = 0x0FFF;

/// Reject raw values outside `0..12`. Callers reduce mod 12 themselves
/// before validating when wrap-around is intended.
pub fn validate_pc<T: Into<i64>>(value: T) -> Result<PitchClass> {
    let value = value.into();
    if (0..12).contains(&value) {
        Ok(value as PitchClass)
    } else {
        Err(Error::PitchClassOutOfRange(value))
    }
}

/// Transpose pitch classes by `semitones`, wrapping mod 12.
pub fn transpose_pcs(pcs: &[PitchClass], semitones: i32) -> Vec<PitchClass> {
    pcs.iter()
        .map(|&pc| (pc as i32 + semitones).rem_euclid(12) as PitchClass)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mask(u16);

impl Mask {
    pub const EMPTY: Mask = Mask(0);
    pub const CHROMATIC: Mask = Mask(FULL);

    /// Build a mask from raw pitch classes, rejecting anything outside `0..12`.
    pub fn from_pcs<T: Copy + Into<i64>>(pcs: &[T]) -> Result<Mask> {
        let mut bits = 0u16;
        for &pc in pcs {
            bits |= 1 << validate_pc(pc)?;
        }
        Ok(Mask(bits))
    }

    /// Wrap raw bits, discarding anything above bit 11.
    pub const fn from_bits(bits: u16) -> Mask {
        Mask(bits & FULL)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Parse a decimal or binary mask. Binary is selected by a `0b` prefix
    /// or by text made only of `0` and `1`.
    pub fn from_text(text: &str) -> Result<Mask> {
        let stripped = text.trim().to_ascii_lowercase();
        let invalid = || Error::InvalidMaskText(text.to_string());
        if stripped.is_empty() {
            return Err(invalid());
        }
        let (digits, radix) = if let Some(rest) = stripped.strip_prefix("0b") {
            (rest, 2)
        } else if stripped.chars().all(|c| c == '0' || c == '1') {
            (stripped.as_str(), 2)
        } else {
            (stripped.as_str(), 10)
        };
        let value = u64::from_str_radix(digits, radix).map_err(|_| invalid())?;
        Ok(Mask((value & FULL as u64) as u16))
    }

    /// Pitch classes present, ascending.
    pub fn pcs(self) -> Vec<PitchClass> {
        (0..12u8).filter(|&pc| self.contains(pc)).collect()
    }

    pub fn contains(self, pc: PitchClass) -> bool {
        pc < 12 && self.0 & (1 << pc) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset_of(self, other: Mask) -> bool {
        self.0 & other.0 == self.0
    }

    /// Rotate every set bit by `semitones` (mod 12, negative allowed).
    pub fn rotate(self, semitones: i32) -> Mask {
        let shift = semitones.rem_euclid(12) as u32;
        if shift == 0 {
            return self;
        }
        let bits = self.0 as u32;
        let rotated = (bits << shift) | (bits >> (12 - shift));
        Mask((rotated & FULL as u32) as u16)
    }

    /// Smallest `k` in `1..=12` such that rotating by `k` reproduces the mask.
    pub fn symmetry_order(self) -> u8 {
        (1..=12u8)
            .find(|&step| self.rotate(step as i32) == self)
            .unwrap_or(12)
    }

    /// Rotation amounts in `1..12` that map the mask onto itself.
    pub fn rotational_steps(self) -> Vec<u8> {
        (1..12u8)
            .filter(|&step| self.rotate(step as i32) == self)
            .collect()
    }

    /// Bit string with pitch class 0 first, e.g. `"100010010000"` for C major.
    pub fn to_binary_string(self) -> String {
        (0..12u8)
            .map(|pc| if self.contains(pc) { '1' } else { '0' })
            .collect()
    }

    pub fn complement(self) -> Mask {
        Mask(!self.0 & FULL)
    }
}

/// Collect pitch classes reducing each mod 12.
impl FromIterator<PitchClass> for Mask {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        let mut bits = 0u16;
        for pc in iter {
            bits |= 1 << (pc % 12);
        }
        Mask(bits)
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitAnd for Mask {
    type Output = Mask;

    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pcs_rejects_out_of_range() {
        assert!(matches!(
            Mask::from_pcs(&[0, 4, 12]),
            Err(Error::PitchClassOutOfRange(12))
        ));
        assert!(matches!(
            Mask::from_pcs(&[-1]),
            Err(Error::PitchClassOutOfRange(-1))
        ));
    }

    #[test]
    fn pcs_round_trip_every_mask() {
        for bits in 0..=FULL {
            let mask = Mask::from_bits(bits);
            assert_eq!(Mask::from_pcs(&mask.pcs()).unwrap(), mask);
        }
    }

    #[test]
    fn rotation_closure() {
        let masks = [0b1001_0001_0001u16, 0b0000_1010_1101, 0b1111_1111_1111, 0];
        for bits in masks {
            let mask = Mask::from_bits(bits);
            for k in 0..12 {
                assert_eq!(mask.rotate(k).rotate(12 - k), mask, "k={k}");
            }
            let order = mask.symmetry_order();
            assert_eq!(mask.rotate(order as i32), mask);
        }
    }

    #[test]
    fn rotate_matches_pcs_shift() {
        let major = Mask::from_pcs(&[0, 4, 7]).unwrap();
        assert_eq!(major.rotate(7).pcs(), vec![2, 7, 11]);
        assert_eq!(major.rotate(-1).pcs(), vec![3, 6, 11]);
    }

    #[test]
    fn whole_tone_symmetry() {
        let whole_tone = Mask::from_pcs(&[0, 2, 4, 6, 8, 10]).unwrap();
        assert_eq!(whole_tone.symmetry_order(), 2);
        assert_ne!(whole_tone.rotate(1), whole_tone);
        assert_eq!(whole_tone.rotational_steps(), vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn asymmetric_sets_have_order_twelve() {
        let major = Mask::from_pcs(&[0, 2, 4, 5, 7, 9, 11]).unwrap();
        assert_eq!(major.symmetry_order(), 12);
        assert!(major.rotational_steps().is_empty());
        assert_eq!(Mask::EMPTY.symmetry_order(), 1);
    }

    #[test]
    fn subset_checks() {
        let triad = Mask::from_pcs(&[0, 4, 7]).unwrap();
        let scale = Mask::from_pcs(&[0, 2, 4, 5, 7, 9, 11]).unwrap();
        assert!(triad.is_subset_of(scale));
        assert!(!scale.is_subset_of(triad));
        assert!(Mask::EMPTY.is_subset_of(triad));
    }

    #[test]
    fn mask_text_parsing() {
        assert_eq!(Mask::from_text("145").unwrap().pcs(), vec![0, 4, 7]);
        assert_eq!(Mask::from_text("0b10010001").unwrap().pcs(), vec![0, 4, 7]);
        assert_eq!(Mask::from_text("10001").unwrap().pcs(), vec![0, 4]);
        assert_eq!(Mask::from_text("65535").unwrap(), Mask::CHROMATIC);
        assert!(Mask::from_text("zz").is_err());
        assert!(Mask::from_text("").is_err());
    }

    #[test]
    fn binary_string_is_pc_ordered() {
        let major = Mask::from_pcs(&[0, 4, 7]).unwrap();
        assert_eq!(major.to_binary_string(), "100010010000");
    }

    #[test]
    fn collect_reduces_mod_12() {
        let mask: Mask = [0u8, 12, 16].into_iter().collect();
        assert_eq!(mask.pcs(), vec![0, 4]);
    }

    #[test]
    fn transpose_wraps() {
        assert_eq!(transpose_pcs(&[10, 11, 0], 3), vec![1, 2, 3]);
        assert_eq!(transpose_pcs(&[0], -1), vec![11]);
    }
}
