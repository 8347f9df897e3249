//! Compact summaries: chord briefs and per-scale chord overviews.

use serde::Serialize;
use tracing::debug;

use pcset::{name_for_pc, Catalog, ChordQuality, PitchClass, Scale, SpellingPref};

use crate::compat::CompatibilityIndex;
use crate::functions::{function_mappings, GeneratedFunction, Mode};
use crate::intervals::{interval_class_histogram, interval_matrix};

/// Quality names in ascending order of extension, used to order a scale
/// overview. Unlisted qualities sort after all of these.
pub const EXTENSIONS_ORDER: &[&str] = &[
    "power", "maj", "min", "dim", "aug", "sus2", "sus4", "maj6", "min6", "majadd9", "minadd9",
    "maj6add9", "min6add9", "maj7", "min7", "min7b5", "minmaj7", "7", "7sus4", "maj9", "min9", "9",
    "9b5", "9#5", "maj7#11", "maj9#11", "11", "min11", "13", "min13", "maj13", "7b5", "7#5", "7b9",
    "7#9", "7#11", "7alt", "dim7",
];

const FINGERPRINT_LIMIT: usize = 3;

/// Up to three most frequent interval classes of the quality, e.g.
/// `"ic3:2, ic4:2, ic5:2"`, or `"none"` for a single note.
pub fn interval_fingerprint(quality: &ChordQuality) -> String {
    let histogram = interval_class_histogram(&interval_matrix(&quality.pcs_from_root(0)));
    let mut ordered: Vec<(u8, usize)> = histogram.into_iter().filter(|&(_, n)| n > 0).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let parts: Vec<String> = ordered
        .iter()
        .take(FINGERPRINT_LIMIT)
        .map(|(ic, count)| format!("ic{ic}:{count}"))
        .collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

/// Default functional mappings for both modes. A mode whose reference
/// scale is missing from the catalog contributes nothing.
pub fn default_mappings(catalog: &Catalog) -> Vec<(Mode, Vec<GeneratedFunction>)> {
    [Mode::Major, Mode::Minor]
        .into_iter()
        .filter_map(|mode| match function_mappings(mode, catalog) {
            Ok(mapping) => Some((mode, mapping)),
            Err(err) => {
                debug!(mode = %mode, error = %err, "no default mapping for mode");
                None
            }
        })
        .collect()
}

/// `"{mode}: {label} ({role})"` for every mapping using `quality_name`,
/// first occurrence kept.
pub fn functional_roles(quality_name: &str, mappings: &[(Mode, Vec<GeneratedFunction>)]) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for (mode, mapping) in mappings {
        for function in mapping.iter().filter(|f| f.chord_quality == quality_name) {
            let descriptor = format!("{}: {} ({})", mode, function.modal_label, function.role);
            if !roles.contains(&descriptor) {
                roles.push(descriptor);
            }
        }
    }
    roles
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordBrief {
    pub interval_fingerprint: String,
    /// `"{scale} (roots 0, 5, 7)"`, widest fit first.
    pub compatible_scales: Vec<String>,
    pub functional_roles: Vec<String>,
}

impl ChordBrief {
    /// Render as display lines; empty sections are left out.
    pub fn as_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Intervals: {}", self.interval_fingerprint)];
        if !self.compatible_scales.is_empty() {
            lines.push(format!("Fits in: {}", self.compatible_scales.join(", ")));
        }
        if !self.functional_roles.is_empty() {
            lines.push(format!("Functions: {}", self.functional_roles.join(", ")));
        }
        lines
    }
}

pub fn chord_brief<'a, I>(
    quality: &ChordQuality,
    scales: I,
    mappings: &[(Mode, Vec<GeneratedFunction>)],
    max_scales: usize,
    index: &CompatibilityIndex,
) -> ChordBrief
where
    I: IntoIterator<Item = &'a Scale>,
{
    let mut fits: Vec<(&str, Vec<PitchClass>)> = scales
        .into_iter()
        .filter(|s| !s.name.eq_ignore_ascii_case("chromatic"))
        .map(|s| (s.name.as_str(), index.roots(quality, s)))
        .filter(|(_, roots)| !roots.is_empty())
        .collect();
    fits.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));

    ChordBrief {
        interval_fingerprint: interval_fingerprint(quality),
        compatible_scales: fits
            .iter()
            .take(max_scales)
            .map(|(name, roots)| {
                let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
                format!("{} (roots {})", name, roots.join(", "))
            })
            .collect(),
        functional_roles: functional_roles(&quality.name, mappings),
    }
}

/// Spelling for overview entries, relative to a tonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverviewSpelling {
    pub tonic_pc: PitchClass,
    pub prefer: SpellingPref,
    pub key_signature: Option<i8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpelledRoot {
    pub root: PitchClass,
    pub root_name: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibleQuality {
    pub quality: String,
    pub roots: Vec<PitchClass>,
    pub spelled: Option<Vec<SpelledRoot>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleOverview {
    pub scale: String,
    pub degrees: Vec<PitchClass>,
    /// Ordered from plain triads toward altered extensions.
    pub compatible: Vec<CompatibleQuality>,
    /// Qualities that fit at no root, by name.
    pub non_diatonic: Vec<String>,
}

fn extension_key(quality: &ChordQuality) -> (usize, usize, u8, &str) {
    let priority = EXTENSIONS_ORDER
        .iter()
        .position(|name| *name == quality.name)
        .unwrap_or(EXTENSIONS_ORDER.len());
    let widest = quality.intervals.iter().copied().max().unwrap_or(0);
    (priority, quality.intervals.len(), widest, quality.name.as_str())
}

fn spell_root(quality: &ChordQuality, root: PitchClass, spelling: &OverviewSpelling) -> SpelledRoot {
    let absolute = (spelling.tonic_pc + root) % 12;
    SpelledRoot {
        root,
        root_name: name_for_pc(absolute, spelling.prefer, spelling.key_signature).to_string(),
        notes: quality
            .pcs_from_root(absolute)
            .into_iter()
            .map(|pc| name_for_pc(pc, spelling.prefer, spelling.key_signature).to_string())
            .collect(),
    }
}

/// Which qualities fit `scale`, and where.
pub fn scale_overview<'a, I>(
    scale: &Scale,
    qualities: I,
    spelling: Option<&OverviewSpelling>,
    index: &CompatibilityIndex,
) -> ScaleOverview
where
    I: IntoIterator<Item = &'a ChordQuality>,
{
    let mut compatible: Vec<(&ChordQuality, Vec<PitchClass>)> = Vec::new();
    let mut non_diatonic = Vec::new();
    for quality in qualities {
        let roots = index.roots(quality, scale);
        if roots.is_empty() {
            non_diatonic.push(quality.name.clone());
        } else {
            compatible.push((quality, roots));
        }
    }
    compatible.sort_by(|a, b| extension_key(a.0).cmp(&extension_key(b.0)));
    non_diatonic.sort();

    ScaleOverview {
        scale: scale.name.clone(),
        degrees: scale.degrees.clone(),
        compatible: compatible
            .into_iter()
            .map(|(quality, roots)| CompatibleQuality {
                quality: quality.name.clone(),
                spelled: spelling.map(|sp| roots.iter().map(|&r| spell_root(quality, r, sp)).collect()),
                roots,
            })
            .collect(),
        non_diatonic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints() {
        let maj = ChordQuality::from_intervals("maj", &[0, 4, 7]);
        assert_eq!(interval_fingerprint(&maj), "ic3:2, ic4:2, ic5:2");
        let dim7 = ChordQuality::from_intervals("dim7", &[0, 3, 6, 9]);
        assert_eq!(interval_fingerprint(&dim7), "ic3:8, ic6:4");
        let unison = ChordQuality::from_intervals("one", &[0]);
        assert_eq!(interval_fingerprint(&unison), "none");
    }

    #[test]
    fn brief_lines() {
        let catalog = Catalog::builtin();
        let mappings = default_mappings(&catalog);
        let index = CompatibilityIndex::new();
        let dom7 = catalog.quality("7").unwrap();
        let brief = chord_brief(dom7, catalog.scales(), &mappings, 3, &index);

        assert!(brief.functional_roles.contains(&"major: V7 (dominant)".to_string()));
        assert!(brief.functional_roles.contains(&"minor: bVII7 (dominant)".to_string()));
        assert!(brief.compatible_scales.len() <= 3);
        let lines = brief.as_lines();
        assert!(lines[0].starts_with("Intervals: "));
        assert!(lines.iter().any(|l| l.starts_with("Functions: major: V7 (dominant)")));
    }

    #[test]
    fn overview_orders_by_extension() {
        let catalog = Catalog::builtin();
        let ionian = catalog.scale("Ionian").unwrap();
        let index = CompatibilityIndex::new();
        let overview = scale_overview(ionian, catalog.qualities(), None, &index);

        let names: Vec<&str> = overview.compatible.iter().map(|c| c.quality.as_str()).collect();
        let maj = names.iter().position(|n| *n == "maj").unwrap();
        let maj7 = names.iter().position(|n| *n == "maj7").unwrap();
        assert!(maj < maj7);
        assert!(overview.non_diatonic.contains(&"aug".to_string()));
        assert!(overview.compatible.iter().all(|c| c.spelled.is_none()));
    }

    #[test]
    fn overview_spells_from_tonic() {
        let ionian = Scale::from_degrees("Ionian", &[0, 2, 4, 5, 7, 9, 11]);
        let maj = ChordQuality::from_intervals("maj", &[0, 4, 7]);
        let spelling = OverviewSpelling {
            tonic_pc: 2,
            prefer: SpellingPref::Sharps,
            key_signature: None,
        };
        let overview = scale_overview(&ionian, [&maj], Some(&spelling), &CompatibilityIndex::new());
        let spelled = overview.compatible[0].spelled.as_ref().unwrap();
        assert_eq!(spelled[0].root_name, "D");
        assert_eq!(spelled[0].notes, vec!["D", "F#", "A"]);
        assert_eq!(spelled[2].root_name, "A");
    }
}
