//! Enharmonic note naming.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, PitchClass, Result};

/// Canonical spellings per pitch class, most common first.
const PC_NAMES: [&[&str]; 12] = [
    &["C", "B#", "Dbb"],
    &["C#", "Db"],
    &["D", "C##", "Ebb"],
    &["D#", "Eb", "Fbb"],
    &["E", "Fb", "D##"],
    &["F", "E#", "Gbb"],
    &["F#", "Gb", "E##"],
    &["G", "F##", "Abb"],
    &["G#", "Ab"],
    &["A", "G##", "Bbb"],
    &["A#", "Bb", "Cbb"],
    &["B", "Cb", "A##"],
];

/// Accidental preference used when a key signature doesn't decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellingPref {
    #[default]
    Auto,
    Sharps,
    Flats,
}

impl FromStr for SpellingPref {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SpellingPref::Auto),
            "sharps" | "sharp" => Ok(SpellingPref::Sharps),
            "flats" | "flat" => Ok(SpellingPref::Flats),
            other => Err(format!("unknown spelling preference {other:?}")),
        }
    }
}

impl fmt::Display for SpellingPref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpellingPref::Auto => "auto",
            SpellingPref::Sharps => "sharps",
            SpellingPref::Flats => "flats",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Family {
    Sharp,
    Flat,
}

fn family_of(name: &str) -> Option<Family> {
    match name.as_bytes().get(1) {
        Some(b'#') => Some(Family::Sharp),
        Some(b'b') => Some(Family::Flat),
        _ => None,
    }
}

/// Pick the spelling with the fewest accidentals from one family.
fn simplest_in(names: &[&'static str], family: Family) -> Option<&'static str> {
    names
        .iter()
        .copied()
        .filter(|name| family_of(name) == Some(family))
        .min_by_key(|name| name.len())
}

/// All canonical names for a pitch class (reduced mod 12).
pub fn names_for_pc(pc: PitchClass) -> &'static [&'static str] {
    PC_NAMES[(pc % 12) as usize]
}

/// Preferred name for a pitch class.
///
/// A natural name always wins. Otherwise a positive key signature selects
/// sharps and a negative one flats; with no signature (or zero) `prefer`
/// decides, and `Auto` keeps the first canonical name. Single accidentals
/// beat doubles within a family.
pub fn name_for_pc(pc: PitchClass, prefer: SpellingPref, key_signature: Option<i8>) -> &'static str {
    let names = names_for_pc(pc);
    if let Some(natural) = names.iter().find(|name| name.len() == 1) {
        return *natural;
    }

    let sharp = simplest_in(names, Family::Sharp);
    let flat = simplest_in(names, Family::Flat);
    match (sharp, flat) {
        (Some(sharp), Some(flat)) => {
            let family = match key_signature {
                Some(sig) if sig > 0 => Some(Family::Sharp),
                Some(sig) if sig < 0 => Some(Family::Flat),
                _ => match prefer {
                    SpellingPref::Sharps => Some(Family::Sharp),
                    SpellingPref::Flats => Some(Family::Flat),
                    SpellingPref::Auto => None,
                },
            };
            match family {
                Some(Family::Sharp) => sharp,
                Some(Family::Flat) => flat,
                None => names[0],
            }
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => names[0],
    }
}

/// Canonical names for `pc` other than `preferred`.
pub fn alternate_names(pc: PitchClass, preferred: &str) -> Vec<&'static str> {
    names_for_pc(pc)
        .iter()
        .copied()
        .filter(|name| *name != preferred)
        .collect()
}

/// Parse a note name: a letter (any case) followed by any run of `#`/`b`.
pub fn pc_from_name(name: &str) -> Result<PitchClass> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let letter = chars
        .next()
        .ok_or_else(|| Error::UnrecognizedPitch(name.to_string()))?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(Error::UnrecognizedPitch(name.to_string())),
    };
    let mut offset = 0i32;
    for accidental in chars {
        match accidental {
            '#' => offset += 1,
            'b' => offset -= 1,
            _ => return Err(Error::UnrecognizedPitch(name.to_string())),
        }
    }
    Ok((base + offset).rem_euclid(12) as PitchClass)
}
