//! Chord-expression parser.
//!
//! Parsing runs in two explicit classification passes. [`classify_form`]
//! decides the outer shape of the expression (bracketed list, `root:quality`,
//! or bare quality name), then [`classify_sequence`] decides what a bracket
//! payload holds. The first matching variant wins; nothing falls through on
//! error.

pub mod token;

use tracing::debug;

use pcset::{name_for_pc, parse_pitch_token, Catalog, ChordQuality, ParsedPitch, Pitch, PitchClass, Scope, SpellingPref};

use crate::annotate::annotate;
use crate::error::{Result, SpecError};
use crate::spec::{fold_intervals, ChordParse, ChordSpec};
use token::{diatonic_semitones, is_perfect_number, lex_degree, lex_integer, lex_interval_name, Degree, IntervalName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `[...]`
    Square,
    /// `(...)`
    Paren,
    /// `{...}`
    Curly,
}

impl Delimiter {
    fn from_open(c: char) -> Option<Self> {
        match c {
            '[' => Some(Delimiter::Square),
            '(' => Some(Delimiter::Paren),
            '{' => Some(Delimiter::Curly),
            _ => None,
        }
    }

    pub fn open(self) -> char {
        match self {
            Delimiter::Square => '[',
            Delimiter::Paren => '(',
            Delimiter::Curly => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Delimiter::Square => ']',
            Delimiter::Paren => ')',
            Delimiter::Curly => '}',
        }
    }
}

/// Outer shape of an expression (alias already removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form<'a> {
    Bracketed {
        delimiter: Delimiter,
        /// Optional root token before the opening bracket.
        prefix: &'a str,
        payload: &'a str,
    },
    RootedQuality {
        root: &'a str,
        quality: &'a str,
    },
    Quality(&'a str),
}

/// What a bracket payload holds, after checking every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sequence {
    /// `{...}`: absolute MIDI numbers.
    Midi(Vec<i64>),
    /// Raw semitone offsets, kept unreduced.
    Integers(Vec<i64>),
    IntervalNames(Vec<IntervalName>),
    Degrees(Vec<Degree>),
    Notes(Vec<ParsedPitch>),
}

impl Sequence {
    fn kind(&self) -> &'static str {
        match self {
            Sequence::Midi(_) => "midi",
            Sequence::Integers(_) => "integers",
            Sequence::IntervalNames(_) => "interval_names",
            Sequence::Degrees(_) => "degrees",
            Sequence::Notes(_) => "notes",
        }
    }
}

/// Root given before a bracket or a `:`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Root {
    pc: Option<PitchClass>,
    pitch: Option<Pitch>,
}

fn split_alias(expr: &str) -> (&str, Option<String>) {
    match expr.split_once('=') {
        Some((core, alias)) => {
            let alias = alias.trim();
            (core.trim(), (!alias.is_empty()).then(|| alias.to_string()))
        }
        None => (expr, None),
    }
}

/// Decide the outer form. The first bracket character present selects the
/// delimiter; the payload runs to the last matching closer.
pub fn classify_form(core: &str) -> Result<Form<'_>> {
    let opener = core
        .char_indices()
        .find_map(|(idx, c)| Delimiter::from_open(c).map(|d| (idx, d)));
    if let Some((left, delimiter)) = opener {
        let unclosed = SpecError::UnclosedBracket {
            open: delimiter.open(),
            close: delimiter.close(),
        };
        let right = core.rfind(delimiter.close()).ok_or(unclosed)?;
        if right < left {
            return Err(SpecError::UnclosedBracket {
                open: delimiter.open(),
                close: delimiter.close(),
            });
        }
        return Ok(Form::Bracketed {
            delimiter,
            prefix: core[..left].trim(),
            payload: core[left + 1..right].trim(),
        });
    }

    if let Some((root, quality)) = core.split_once(':') {
        return Ok(Form::RootedQuality {
            root: root.trim(),
            quality: quality.trim(),
        });
    }
    Ok(Form::Quality(core.trim()))
}

fn pitch_token(token: &str) -> Result<ParsedPitch> {
    parse_pitch_token(token).map_err(|err| SpecError::from_token(token, err))
}

/// Classify a bracket payload. Square brackets try integers, then interval
/// names, then degrees, then note tokens; each class must cover every token.
pub fn classify_sequence(delimiter: Delimiter, parts: &[&str]) -> Result<Sequence> {
    let unrecognized = |token: &str| SpecError::UnrecognizedToken {
        token: token.to_string(),
    };
    match delimiter {
        Delimiter::Curly => parts
            .iter()
            .map(|t| {
                lex_integer(t).ok_or_else(|| SpecError::ExpectedInteger {
                    token: t.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Sequence::Midi),
        Delimiter::Paren => parts
            .iter()
            .map(|t| lex_degree(t).ok_or_else(|| unrecognized(t)))
            .collect::<Result<Vec<_>>>()
            .map(Sequence::Degrees),
        Delimiter::Square => {
            if let Some(values) = parts.iter().map(|t| lex_integer(t)).collect::<Option<Vec<_>>>() {
                return Ok(Sequence::Integers(values));
            }
            if let Some(names) = parts.iter().map(|t| lex_interval_name(t)).collect::<Option<Vec<_>>>() {
                return Ok(Sequence::IntervalNames(names));
            }
            if let Some(degrees) = parts.iter().map(|t| lex_degree(t)).collect::<Option<Vec<_>>>() {
                return Ok(Sequence::Degrees(degrees));
            }
            parts
                .iter()
                .map(|t| pitch_token(t))
                .collect::<Result<Vec<_>>>()
                .map(Sequence::Notes)
        }
    }
}

/// Base semitones for `number`, or the reason it has none.
fn diatonic_base(number: u32, token: impl FnOnce() -> String) -> Result<i32> {
    match diatonic_semitones(number) {
        Some(base) => Ok(base),
        None if number == 0 => Err(SpecError::UnrecognizedToken { token: token() }),
        None => Err(SpecError::OffsetOutOfRange { token: token() }),
    }
}

/// Semitones for a classical interval name.
pub fn interval_semitones(name: IntervalName) -> Result<i32> {
    let token = || format!("{}{}", name.quality, name.number);
    let base = diatonic_base(name.number, token)?;
    let perfect = is_perfect_number(name.number);
    let adjust = match name.quality {
        'P' if perfect => 0,
        'M' if !perfect => 0,
        'm' if !perfect => -1,
        'A' => 1,
        'd' if perfect => -1,
        'd' => -2,
        _ => {
            return Err(SpecError::InvalidIntervalQuality {
                quality: name.quality,
                number: name.number,
            })
        }
    };
    base.checked_add(adjust)
        .ok_or_else(|| SpecError::OffsetOutOfRange { token: token() })
}

/// Semitones for a scale-degree token; 0 names no degree.
pub fn degree_semitones(degree: Degree) -> Result<i32> {
    let token = || degree.number.to_string();
    diatonic_base(degree.number, token)?
        .checked_add(degree.shift)
        .ok_or_else(|| SpecError::OffsetOutOfRange { token: token() })
}

fn to_offset(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| SpecError::OffsetOutOfRange {
        token: value.to_string(),
    })
}

fn parse_root(token: &str) -> Result<Root> {
    if token.is_empty() {
        return Ok(Root::default());
    }
    let parsed = pitch_token(token)?;
    Ok(Root {
        pc: Some(parsed.pc),
        pitch: parsed.pitch,
    })
}

fn abstract_spec(tokens: &[&str], voicing: Vec<i32>) -> ChordSpec {
    ChordSpec {
        scope: Scope::Abstract,
        intervals: fold_intervals(&voicing),
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
        voicing,
        ..ChordSpec::default()
    }
}

fn absolute_spec(tokens: Vec<String>, pitches: Vec<Pitch>, base: Pitch) -> Result<ChordSpec> {
    let voicing = pitches
        .iter()
        .map(|p| {
            p.midi.checked_sub(base.midi).ok_or_else(|| SpecError::OffsetOutOfRange {
                token: p.midi.to_string(),
            })
        })
        .collect::<Result<Vec<i32>>>()?;
    Ok(ChordSpec {
        scope: Scope::Absolute,
        intervals: fold_intervals(&voicing),
        tokens,
        absolute: pitches,
        voicing,
        ..ChordSpec::default()
    })
}

/// Re-express an abstract spec against a root. An absolute root yields
/// absolute pitches; a bare pitch class yields note names and keeps the
/// written voicing.
fn apply_root(mut spec: ChordSpec, root: Root) -> Result<(ChordSpec, Option<PitchClass>, Option<Pitch>)> {
    if spec.scope != Scope::Abstract {
        return Ok((spec, root.pc, root.pitch));
    }
    let offsets: Vec<i32> = if spec.voicing.is_empty() {
        spec.intervals.iter().map(|&iv| iv as i32).collect()
    } else {
        spec.voicing.clone()
    };

    if let Some(pitch) = root.pitch {
        spec.absolute = offsets
            .iter()
            .map(|&off| pitch.checked_transpose(off))
            .collect::<pcset::Result<Vec<_>>>()?;
        spec.tokens = spec.absolute.iter().map(ToString::to_string).collect();
        spec.intervals = fold_intervals(&offsets);
        spec.voicing = offsets;
        spec.scope = Scope::Absolute;
        return Ok((spec, Some(pitch.pc), Some(pitch)));
    }

    if let Some(pc) = root.pc {
        spec.tokens = offsets
            .iter()
            .map(|off| {
                let note = (pc as i32 + off.rem_euclid(12)) % 12;
                let note = note as PitchClass;
                name_for_pc(note, SpellingPref::Auto, None).to_string()
            })
            .collect();
        spec.intervals = fold_intervals(&offsets);
        spec.scope = Scope::Note;
        return Ok((spec, Some(pc), None));
    }

    Ok((spec, None, None))
}

fn resolve_sequence(sequence: Sequence, parts: &[&str], root: Root) -> Result<ChordParse> {
    let abstract_values: Vec<i32> = match &sequence {
        Sequence::Integers(values) => values.iter().map(|&v| to_offset(v)).collect::<Result<_>>()?,
        Sequence::IntervalNames(names) => names.iter().map(|&n| interval_semitones(n)).collect::<Result<_>>()?,
        Sequence::Degrees(degrees) => degrees.iter().map(|&d| degree_semitones(d)).collect::<Result<_>>()?,
        Sequence::Midi(values) => {
            let pitches = values
                .iter()
                .map(|&v| to_offset(v).map(Pitch::from_midi))
                .collect::<Result<Vec<_>>>()?;
            let base = root.pitch.unwrap_or(pitches[0]);
            let tokens = parts.iter().map(|t| t.to_string()).collect();
            return Ok(ChordParse {
                spec: absolute_spec(tokens, pitches, base)?,
                root_pc: Some(base.pc),
                root_pitch: Some(base),
            });
        }
        Sequence::Notes(parsed) => return resolve_notes(parsed, root),
    };

    let (spec, root_pc, root_pitch) = apply_root(abstract_spec(parts, abstract_values), root)?;
    Ok(ChordParse {
        spec,
        root_pc,
        root_pitch,
    })
}

fn resolve_notes(parsed: &[ParsedPitch], root: Root) -> Result<ChordParse> {
    let tokens: Vec<String> = parsed.iter().map(|p| p.token.clone()).collect();
    if parsed.iter().any(ParsedPitch::is_absolute) {
        let pitches = parsed
            .iter()
            .map(|p| p.pitch.ok_or(SpecError::MixedPitchTokens))
            .collect::<Result<Vec<_>>>()?;
        let base = root.pitch.unwrap_or(pitches[0]);
        return Ok(ChordParse {
            spec: absolute_spec(tokens, pitches, base)?,
            root_pc: Some(base.pc),
            root_pitch: Some(base),
        });
    }

    let base_pc = root.pc.unwrap_or(parsed[0].pc);
    let offsets: Vec<i32> = parsed
        .iter()
        .map(|p| p.pc as i32 - base_pc as i32)
        .collect();
    Ok(ChordParse {
        spec: ChordSpec {
            scope: Scope::Note,
            intervals: fold_intervals(&offsets),
            tokens,
            ..ChordSpec::default()
        },
        root_pc: Some(base_pc),
        root_pitch: root.pitch,
    })
}

fn resolve_quality<'c>(name: &str, catalog: &'c Catalog) -> Result<&'c ChordQuality> {
    catalog.quality(name).ok_or_else(|| SpecError::UnknownQuality {
        name: name.to_string(),
    })
}

fn spec_from_quality(quality: &ChordQuality) -> ChordSpec {
    ChordSpec {
        scope: Scope::Abstract,
        intervals: quality.intervals.clone(),
        tensions: quality.tensions.clone(),
        voicing: quality.intervals.iter().map(|&iv| iv as i32).collect(),
        quality_name: Some(quality.name.clone()),
        quality_matches: vec![quality.name.clone()],
        ..ChordSpec::default()
    }
}

/// Parse a chord expression against `catalog`.
pub fn parse(text: &str, catalog: &Catalog) -> Result<ChordParse> {
    let (core, label) = split_alias(text.trim());
    if core.is_empty() {
        return Err(SpecError::Empty);
    }

    let form = classify_form(core)?;
    let mut parsed = match form {
        Form::Bracketed {
            delimiter,
            prefix,
            payload,
        } => {
            let parts: Vec<&str> = payload
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            if parts.is_empty() {
                return Err(SpecError::EmptyPayload);
            }
            let root = parse_root(prefix)?;
            let sequence = classify_sequence(delimiter, &parts)?;
            debug!(delimiter = ?delimiter, sequence = sequence.kind(), "bracketed chord expression");
            resolve_sequence(sequence, &parts, root)?
        }
        Form::RootedQuality { root, quality } => {
            let quality = resolve_quality(quality, catalog)?;
            let root = parse_root(root)?;
            debug!(quality = %quality.name, "rooted quality expression");
            let (spec, root_pc, root_pitch) = apply_root(spec_from_quality(quality), root)?;
            ChordParse {
                spec,
                root_pc,
                root_pitch,
            }
        }
        Form::Quality(name) => {
            let quality = resolve_quality(name, catalog)?;
            debug!(quality = %quality.name, "bare quality expression");
            ChordParse {
                spec: spec_from_quality(quality),
                root_pc: None,
                root_pitch: None,
            }
        }
    };

    parsed.spec.label = label;
    parsed.spec = annotate(parsed.spec, catalog);
    Ok(parsed)
}
