//! Absolute pitches and pitch-token parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use winnow::ascii::digit1;
use winnow::combinator::opt;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::spelling::{name_for_pc, pc_from_name, SpellingPref};
use crate::{Error, PitchClass, Result};

type PResult<T> = winnow::ModalResult<T>;

/// An absolute pitch. MIDI 60 is C4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub midi: i32,
    pub pc: PitchClass,
    pub octave: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
}

impl Pitch {
    pub fn from_midi(midi: i32) -> Self {
        Self {
            midi,
            pc: midi.rem_euclid(12) as PitchClass,
            octave: midi.div_euclid(12) - 1,
            velocity: None,
            channel: None,
        }
    }

    /// Build from a pitch class (reduced mod 12) and an octave number.
    pub fn from_components(pc: i32, octave: i32) -> Self {
        Self::from_midi(pc.rem_euclid(12) + 12 * (octave + 1))
    }

    /// Like [`Pitch::from_components`], but fails when the MIDI number
    /// does not fit in an `i32`.
    pub fn checked_from_components(pc: i32, octave: i32) -> Result<Self> {
        octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|base| base.checked_add(pc.rem_euclid(12)))
            .map(Self::from_midi)
            .ok_or(Error::PitchOutOfRange(i64::from(octave)))
    }

    /// Move by `semitones`, failing on `i32` overflow.
    pub fn checked_transpose(&self, semitones: i32) -> Result<Self> {
        self.midi
            .checked_add(semitones)
            .map(Self::from_midi)
            .ok_or(Error::PitchOutOfRange(i64::from(self.midi) + i64::from(semitones)))
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Note name plus octave, e.g. `"Eb3"`.
    pub fn name(&self, prefer: SpellingPref, key_signature: Option<i8>) -> String {
        format!("{}{}", name_for_pc(self.pc, prefer, key_signature), self.octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name(SpellingPref::Auto, None))
    }
}

/// How concretely a pitch collection is pinned down: bare intervals, pitch
/// classes relative to a named root, or absolute pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Abstract,
    Note,
    Absolute,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Abstract => "abstract",
            Scope::Note => "note",
            Scope::Absolute => "absolute",
        })
    }
}

/// One pitch token resolved to a pitch class and, when it carried an
/// octave or a MIDI number, an absolute pitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPitch {
    pub pc: PitchClass,
    pub pitch: Option<Pitch>,
    pub token: String,
    pub is_note_token: bool,
}

impl ParsedPitch {
    pub fn is_absolute(&self) -> bool {
        self.pitch.is_some()
    }
}

/// Letter plus up to two `#`/`b` accidentals.
fn note_name<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (one_of(('A'..='G', 'a'..='g')), take_while(0..=2, ['#', 'b']))
        .take()
        .parse_next(input)
}

fn octave_number(input: &mut &str) -> PResult<i32> {
    (opt('-'), digit1)
        .take()
        .try_map(str::parse::<i32>)
        .parse_next(input)
}

fn note_token<'s>(input: &mut &'s str) -> PResult<(&'s str, Option<i32>)> {
    (note_name, opt(octave_number)).parse_next(input)
}

/// Parse a single pitch token.
///
/// Integers up to 11 are bare pitch classes (negative values wrap), larger
/// integers are MIDI numbers. Anything else must be a note name with an
/// optional octave, which makes the result absolute.
pub fn parse_pitch_token(token: &str) -> Result<ParsedPitch> {
    let stripped = token.trim();
    if stripped.is_empty() {
        return Err(Error::UnrecognizedPitch(token.to_string()));
    }

    if let Ok(value) = stripped.parse::<i64>() {
        if value <= 11 {
            return Ok(ParsedPitch {
                pc: value.rem_euclid(12) as PitchClass,
                pitch: None,
                token: stripped.to_string(),
                is_note_token: false,
            });
        }
        let midi = i32::try_from(value).map_err(|_| Error::UnrecognizedPitch(token.to_string()))?;
        let pitch = Pitch::from_midi(midi);
        return Ok(ParsedPitch {
            pc: pitch.pc,
            pitch: Some(pitch),
            token: stripped.to_string(),
            is_note_token: false,
        });
    }

    let mut input = stripped;
    let (name, octave) = note_token
        .parse_next(&mut input)
        .map_err(|_| Error::UnrecognizedPitch(token.to_string()))?;
    if !input.is_empty() {
        return Err(Error::UnrecognizedPitch(token.to_string()));
    }

    let pc = pc_from_name(name)?;
    Ok(ParsedPitch {
        pc,
        pitch: octave
            .map(|octave| Pitch::checked_from_components(pc as i32, octave))
            .transpose()?,
        token: stripped.to_string(),
        is_note_token: true,
    })
}
