//! Catalog classification of parsed interval sets.

use std::collections::BTreeSet;

use pcset::{Catalog, Mask};

use crate::spec::{ChordSpec, QualityVariant};

/// Each bucket keeps at most this many entries.
pub const VARIANT_LIMIT: usize = 6;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    pub exact: Vec<String>,
    pub subsets: Vec<QualityVariant>,
    pub supersets: Vec<QualityVariant>,
    pub cousins: Vec<QualityVariant>,
}

/// Compare `intervals` against every catalog quality.
pub fn classify(intervals: Mask, catalog: &Catalog) -> Classification {
    let mut out = Classification::default();
    for quality in catalog.qualities() {
        let missing = Mask::from_bits(quality.mask.bits() & !intervals.bits()).pcs();
        let extra = Mask::from_bits(intervals.bits() & !quality.mask.bits()).pcs();
        match (missing.is_empty(), extra.is_empty()) {
            (true, true) => out.exact.push(quality.name.clone()),
            (false, true) => out.subsets.push(QualityVariant::new(&quality.name, missing, extra)),
            (true, false) => out.supersets.push(QualityVariant::new(&quality.name, missing, extra)),
            (false, false) => out.cousins.push(QualityVariant::new(&quality.name, missing, extra)),
        }
    }

    out.exact.sort();
    out.exact.truncate(VARIANT_LIMIT);
    for bucket in [&mut out.subsets, &mut out.supersets, &mut out.cousins] {
        bucket.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.name.cmp(&b.name)));
        bucket.truncate(VARIANT_LIMIT);
    }
    out
}

/// Fill the classification fields of `spec`. An explicit quality name
/// stays primary; otherwise the first exact match (by name) is chosen.
pub fn annotate(mut spec: ChordSpec, catalog: &Catalog) -> ChordSpec {
    if catalog.quality_count() == 0 {
        return spec;
    }
    let classification = classify(spec.mask(), catalog);

    let mut matches: BTreeSet<String> = spec.quality_matches.drain(..).collect();
    if let Some(name) = &spec.quality_name {
        matches.insert(name.clone());
    }
    matches.extend(classification.exact);

    spec.quality_matches = matches.into_iter().collect();
    if spec.quality_name.is_none() {
        spec.quality_name = spec.quality_matches.first().cloned();
    }
    spec.quality_subsets = classification.subsets;
    spec.quality_supersets = classification.supersets;
    spec.quality_cousins = classification.cousins;
    spec
}
