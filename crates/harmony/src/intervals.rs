//! Pairwise interval measurements over pitch-class collections.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use pcset::PitchClass;

use crate::labels::{label_interval, IntervalLabelStyle};

/// Fold a semitone distance to its interval class in `0..=6`.
pub fn interval_class(interval: u8) -> u8 {
    let iv = interval % 12;
    if iv <= 6 {
        iv
    } else {
        12 - iv
    }
}

/// `matrix[i][j] = (pcs[j] - pcs[i]) mod 12`.
pub fn interval_matrix(pcs: &[PitchClass]) -> Vec<Vec<u8>> {
    pcs.iter()
        .map(|&a| pcs.iter().map(|&b| (b + 12 - a) % 12).collect())
        .collect()
}

/// Octave complement of every cell.
pub fn invert_matrix(matrix: &[Vec<u8>]) -> Vec<Vec<u8>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|&iv| (12 - iv % 12) % 12).collect())
        .collect()
}

/// Count interval classes over every non-zero cell of `matrix`.
pub fn interval_class_histogram(matrix: &[Vec<u8>]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for &iv in matrix.iter().flatten().filter(|&&iv| iv != 0) {
        *counts.entry(interval_class(iv)).or_insert(0) += 1;
    }
    counts
}

/// Histogram with labelled keys, kept in interval-class order.
pub fn label_histogram(histogram: &BTreeMap<u8, usize>, style: IntervalLabelStyle) -> Vec<(String, usize)> {
    histogram
        .iter()
        .map(|(&ic, &count)| (label_interval(ic as i32, style), count))
        .collect()
}

fn unique_sorted(pcs: &[PitchClass]) -> Vec<PitchClass> {
    pcs.iter()
        .map(|&pc| pc % 12)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn unordered_pairs(unique: &[PitchClass]) -> impl Iterator<Item = u8> + '_ {
    unique
        .iter()
        .enumerate()
        .flat_map(move |(i, &a)| unique[i + 1..].iter().map(move |&b| (b + 12 - a) % 12))
}

/// Six-slot interval-class vector over unique unordered pairs.
pub fn interval_vector(pcs: &[PitchClass]) -> [usize; 6] {
    let unique = unique_sorted(pcs);
    let mut vector = [0usize; 6];
    for diff in unordered_pairs(&unique) {
        let ic = interval_class(diff);
        if (1..=6).contains(&ic) {
            vector[ic as usize - 1] += 1;
        }
    }
    vector
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub cardinality: usize,
    pub distinct_pcs: usize,
    pub interval_vector: [usize; 6],
    pub smallest_interval: Option<u8>,
    pub largest_interval: Option<u8>,
    /// Highest minus lowest pitch class.
    pub span_semitones: u8,
    /// Narrowest span over every rotation of the set, so clusters that
    /// straddle the octave boundary measure as compact.
    pub span_compact: u8,
    /// Ascending distances between each unordered pair.
    pub interval_pairs: Vec<u8>,
}

pub fn interval_summary(pcs: &[PitchClass]) -> IntervalSummary {
    if pcs.is_empty() {
        return IntervalSummary::default();
    }
    let unique = unique_sorted(pcs);
    let mut pairs: Vec<u8> = unordered_pairs(&unique).collect();
    pairs.sort_unstable();
    let nonzero = pairs.iter().copied().filter(|&iv| iv != 0);

    let n = unique.len();
    let span_linear = match (unique.first(), unique.last()) {
        (Some(&lo), Some(&hi)) if n > 1 => hi - lo,
        _ => 0,
    };
    let span_compact = if n > 1 {
        let doubled: Vec<u8> = unique.iter().copied().chain(unique.iter().map(|&pc| pc + 12)).collect();
        (0..n)
            .map(|i| doubled[i + n - 1] - doubled[i])
            .min()
            .unwrap_or(span_linear)
    } else {
        span_linear
    };

    IntervalSummary {
        cardinality: pcs.len(),
        distinct_pcs: n,
        interval_vector: interval_vector(&unique),
        smallest_interval: nonzero.clone().min(),
        largest_interval: nonzero.max(),
        span_semitones: span_linear,
        span_compact,
        interval_pairs: pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_triad_matrix() {
        let matrix = interval_matrix(&[0, 4, 7]);
        assert_eq!(matrix, vec![vec![0, 4, 7], vec![8, 0, 3], vec![5, 9, 0]]);
        assert_eq!(invert_matrix(&matrix)[0], vec![0, 8, 5]);
    }

    #[test]
    fn histogram_folds_to_interval_classes() {
        let hist = interval_class_histogram(&interval_matrix(&[0, 4, 7]));
        // 4 and 8 fold to 4; 3 and 9 to 3; 5 and 7 to 5
        assert_eq!(hist, BTreeMap::from([(3, 2), (4, 2), (5, 2)]));
        let labelled = label_histogram(&hist, IntervalLabelStyle::Classical);
        assert_eq!(labelled[0], ("m3".to_string(), 2));
    }

    #[test]
    fn diatonic_interval_vector() {
        assert_eq!(interval_vector(&[0, 2, 4, 5, 7, 9, 11]), [2, 5, 4, 3, 6, 1]);
        assert_eq!(interval_vector(&[0, 4, 7, 12]), [0, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn compact_span_wraps_the_octave() {
        let summary = interval_summary(&[0, 1, 11]);
        assert_eq!(summary.span_semitones, 11);
        assert_eq!(summary.span_compact, 2);
        assert_eq!(summary.smallest_interval, Some(1));
        assert_eq!(summary.largest_interval, Some(11));
        assert_eq!(summary.interval_pairs, vec![1, 10, 11]);
    }

    #[test]
    fn empty_and_single_sets() {
        assert_eq!(interval_summary(&[]), IntervalSummary::default());
        let single = interval_summary(&[5]);
        assert_eq!(single.distinct_pcs, 1);
        assert_eq!(single.span_compact, 0);
        assert_eq!(single.smallest_interval, None);
    }
}
