use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

const CLASSICAL: [&str; 12] = [
    "P1", "m2", "M2", "m3", "M3", "P4", "TT", "P5", "m6", "M6", "m7", "M7",
];

/// How interval sizes are rendered in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalLabelStyle {
    /// Semitone count, `"7"`.
    #[default]
    Numeric,
    /// Interval name, `"P5"`.
    Classical,
}

impl FromStr for IntervalLabelStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(IntervalLabelStyle::Numeric),
            "classical" => Ok(IntervalLabelStyle::Classical),
            _ => Err(Error::InvalidSetting {
                key: "interval_labels",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for IntervalLabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalLabelStyle::Numeric => write!(f, "numeric"),
            IntervalLabelStyle::Classical => write!(f, "classical"),
        }
    }
}

/// Label an interval, reduced mod 12 first.
pub fn label_interval(interval: i32, style: IntervalLabelStyle) -> String {
    let reduced = interval.rem_euclid(12) as usize;
    match style {
        IntervalLabelStyle::Numeric => reduced.to_string(),
        IntervalLabelStyle::Classical => CLASSICAL[reduced].to_string(),
    }
}

pub fn label_matrix(matrix: &[Vec<u8>], style: IntervalLabelStyle) -> Vec<Vec<String>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|&iv| label_interval(iv as i32, style)).collect())
        .collect()
}
