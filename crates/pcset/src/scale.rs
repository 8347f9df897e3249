use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mask::Mask;
use crate::{PitchClass, Result};

/// A named pitch-class collection relative to its own tonic (degree 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub name: String,
    pub degrees: Vec<PitchClass>,
    pub mask: Mask,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Scale {
    /// Folding constructor: degrees are reduced mod 12, deduplicated, and
    /// sorted. [`Scale::try_from_degrees`] is the validating counterpart.
    pub fn from_degrees<T: Copy + Into<i64>>(name: impl Into<String>, degrees: &[T]) -> Self {
        let mask: Mask = degrees
            .iter()
            .map(|&d| d.into().rem_euclid(12) as PitchClass)
            .collect();
        Self::from_mask(name, mask)
    }

    /// Like [`Scale::from_degrees`], but any degree outside `0..12` is a
    /// [`crate::Error::PitchClassOutOfRange`].
    pub fn try_from_degrees<T: Copy + Into<i64>>(name: impl Into<String>, degrees: &[T]) -> Result<Self> {
        Ok(Self::from_mask(name, Mask::from_pcs(degrees)?))
    }

    fn from_mask(name: impl Into<String>, mask: Mask) -> Self {
        Self {
            name: name.into(),
            degrees: mask.pcs(),
            mask,
            aliases: Vec::new(),
        }
    }

    /// Replace the alias list. Blank aliases are dropped; the rest are
    /// trimmed, sorted, and deduplicated.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = aliases
            .into_iter()
            .map(|alias| alias.as_ref().trim().to_string())
            .filter(|alias| !alias.is_empty())
            .collect();
        cleaned.sort();
        cleaned.dedup();
        self.aliases = cleaned;
        self
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.mask.contains(pc)
    }

    /// New scale with every degree shifted, named `"{name}+{semitones}"`.
    pub fn transpose(&self, semitones: i32) -> Scale {
        let shifted: Vec<i64> = self
            .degrees
            .iter()
            .map(|&pc| pc as i64 + semitones as i64)
            .collect();
        Scale::from_degrees(format!("{}+{}", self.name, semitones), &shifted)
            .with_aliases(&self.aliases)
    }

    pub fn symmetry_order(&self) -> u8 {
        self.mask.symmetry_order()
    }

    pub fn complementary_pcs(&self) -> Vec<PitchClass> {
        self.mask.complement().pcs()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| alias == name)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees: Vec<String> = self.degrees.iter().map(|pc| pc.to_string()).collect();
        write!(f, "Scale(name={}, degrees=[{}]", self.name, degrees.join(","))?;
        if !self.aliases.is_empty() {
            write!(f, ", aliases=[{}]", self.aliases.join(","))?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ionian() -> Scale {
        Scale::from_degrees("Ionian", &[0, 2, 4, 5, 7, 9, 11]).with_aliases(["major"])
    }

    #[test]
    fn degrees_are_normalized() {
        let scale = Scale::from_degrees("odd", &[14, 0, 2, -1, 12]);
        assert_eq!(scale.degrees, vec![0, 2, 11]);
        assert_eq!(scale.mask, Mask::from_pcs(&[0, 2, 11]).unwrap());
    }

    #[test]
    fn strict_degrees_are_range_checked() {
        let err = Scale::try_from_degrees("odd", &[0, 2, -1]).unwrap_err();
        assert!(matches!(err, crate::Error::PitchClassOutOfRange(-1)));
        let scale = Scale::try_from_degrees("pair", &[6, 0, 6]).unwrap();
        assert_eq!(scale.degrees, vec![0, 6]);
    }

    #[test]
    fn aliases_are_trimmed_and_sorted() {
        let scale = Scale::from_degrees("x", &[0]).with_aliases([" b", "a", "", "b "]);
        assert_eq!(scale.aliases, vec!["a", "b"]);
    }

    #[test]
    fn transpose_names_and_shifts() {
        let d = ionian().transpose(2);
        assert_eq!(d.name, "Ionian+2");
        assert_eq!(d.degrees, vec![1, 2, 4, 6, 7, 9, 11]);
        assert_eq!(d.aliases, vec!["major"]);
        assert_eq!(ionian().transpose(-1).degrees, vec![1, 3, 4, 6, 8, 10, 11]);
    }

    #[test]
    fn complement_and_contains() {
        let scale = ionian();
        assert!(scale.contains(4));
        assert!(!scale.contains(1));
        assert_eq!(scale.complementary_pcs(), vec![1, 3, 6, 8, 10]);
    }

    #[test]
    fn display_form() {
        assert_eq!(
            ionian().to_string(),
            "Scale(name=Ionian, degrees=[0,2,4,5,7,9,11], aliases=[major])"
        );
        assert_eq!(
            Scale::from_degrees("pair", &[0, 6]).to_string(),
            "Scale(name=pair, degrees=[0,6])"
        );
    }

    #[test]
    fn whole_tone_order() {
        let whole = Scale::from_degrees("Whole Tone", &[0, 2, 4, 6, 8, 10]);
        assert_eq!(whole.symmetry_order(), 2);
        assert_eq!(ionian().symmetry_order(), 12);
    }
}
