//! Token lexers for bracket payloads.
//!
//! Each lexer accepts a whole, already-trimmed token or nothing; partial
//! matches are rejected.

use winnow::ascii::digit1;
use winnow::combinator::{alt, eof, opt, terminated};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

type PResult<T> = winnow::ModalResult<T>;

/// Semitones above the tonic for major-scale steps 1..=7.
const MAJOR_STEPS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Interval numbers that take `P` rather than `M`/`m`.
const PERFECT_NUMBERS: [u32; 6] = [1, 4, 5, 8, 11, 12];

/// Classical interval name such as `m3`, `P5`, or `A11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalName {
    pub quality: char,
    pub number: u32,
}

/// Scale-degree token such as `b3`, `#11`, or `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degree {
    /// Net accidental shift in semitones.
    pub shift: i32,
    pub number: u32,
}

/// Base semitones for a 1-based diatonic number, extended by octaves past 7.
/// `None` for 0, which names no degree, and for numbers whose octave
/// extension does not fit in an `i32`.
pub fn diatonic_semitones(number: u32) -> Option<i32> {
    if number == 0 {
        return None;
    }
    let step = ((number - 1) % 7) as usize;
    let octaves = i32::try_from((number - 1) / 7).ok()?;
    octaves.checked_mul(12)?.checked_add(MAJOR_STEPS[step])
}

pub fn is_perfect_number(number: u32) -> bool {
    PERFECT_NUMBERS.contains(&number)
}

fn signed_integer(input: &mut &str) -> PResult<i64> {
    (opt(one_of(['+', '-'])), digit1)
        .take()
        .try_map(str::parse::<i64>)
        .parse_next(input)
}

fn interval_name(input: &mut &str) -> PResult<IntervalName> {
    (
        one_of(['P', 'M', 'A', 'm', 'd']),
        take_while(1..=2, |c: char| c.is_ascii_digit()).try_map(str::parse::<u32>),
    )
        .map(|(quality, number)| IntervalName { quality, number })
        .parse_next(input)
}

fn accidental(input: &mut &str) -> PResult<i32> {
    alt(("bb".value(-2), "b".value(-1), "##".value(2), "#".value(1))).parse_next(input)
}

fn degree(input: &mut &str) -> PResult<Degree> {
    (opt(accidental), digit1.try_map(str::parse::<u32>))
        .map(|(shift, number)| Degree {
            shift: shift.unwrap_or(0),
            number,
        })
        .parse_next(input)
}

fn whole<T>(token: &str, parser: fn(&mut &str) -> PResult<T>) -> Option<T> {
    let mut input = token;
    terminated(parser, eof).parse_next(&mut input).ok()
}

pub fn lex_integer(token: &str) -> Option<i64> {
    whole(token, signed_integer)
}

pub fn lex_interval_name(token: &str) -> Option<IntervalName> {
    whole(token, interval_name)
}

pub fn lex_degree(token: &str) -> Option<Degree> {
    whole(token, degree)
}
