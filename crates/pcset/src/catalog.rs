//! Scale and chord-quality catalog.
//!
//! A [`Catalog`] is an immutable snapshot handed to every parser and
//! generator call. It is built either from the embedded defaults
//! ([`Catalog::builtin`]) or from JSON entry lists:
//!
//! ```json
//! [{"name": "Ionian", "degrees": [0, 2, 4, 5, 7, 9, 11], "aliases": ["major"]}]
//! [{"name": "9", "intervals": [0, 4, 7, 10, 14], "tensions": [14]}]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::mask::{validate_pc, Mask};
use crate::quality::ChordQuality;
use crate::scale::Scale;
use crate::{Error, Result};

/// Raw scale record as it appears in catalog JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub name: String,
    pub degrees: Vec<i64>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Raw chord-quality record as it appears in catalog JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityEntry {
    pub name: String,
    pub intervals: Vec<i64>,
    #[serde(default)]
    pub tensions: Vec<i64>,
}

/// (name, degrees, aliases)
static BUILTIN_SCALES: &[(&str, &[u8], &[&str])] = &[
    ("Ionian", &[0, 2, 4, 5, 7, 9, 11], &["major"]),
    ("Dorian", &[0, 2, 3, 5, 7, 9, 10], &[]),
    ("Phrygian", &[0, 1, 3, 5, 7, 8, 10], &[]),
    ("Lydian", &[0, 2, 4, 6, 7, 9, 11], &[]),
    ("Mixolydian", &[0, 2, 4, 5, 7, 9, 10], &[]),
    ("Aeolian", &[0, 2, 3, 5, 7, 8, 10], &["minor", "Natural Minor"]),
    ("Locrian", &[0, 1, 3, 5, 6, 8, 10], &[]),
    ("Harmonic Minor", &[0, 2, 3, 5, 7, 8, 11], &[]),
    ("Melodic Minor", &[0, 2, 3, 5, 7, 9, 11], &["Jazz Minor"]),
    ("Major Pentatonic", &[0, 2, 4, 7, 9], &[]),
    ("Minor Pentatonic", &[0, 3, 5, 7, 10], &[]),
    ("Blues", &[0, 3, 5, 6, 7, 10], &[]),
    ("Whole Tone", &[0, 2, 4, 6, 8, 10], &[]),
    ("Octatonic Half-Whole", &[0, 1, 3, 4, 6, 7, 9, 10], &["Dominant Diminished"]),
    ("Octatonic Whole-Half", &[0, 2, 3, 5, 6, 8, 9, 11], &["Diminished"]),
    ("Augmented", &[0, 3, 4, 7, 8, 11], &[]),
    ("Chromatic", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11], &[]),
];

/// (name, intervals, tensions); compound intervals fold to their pitch class.
static BUILTIN_QUALITIES: &[(&str, &[u8], &[u8])] = &[
    ("power", &[0, 7], &[]),
    ("maj", &[0, 4, 7], &[]),
    ("min", &[0, 3, 7], &[]),
    ("dim", &[0, 3, 6], &[]),
    ("aug", &[0, 4, 8], &[]),
    ("sus2", &[0, 2, 7], &[]),
    ("sus4", &[0, 5, 7], &[]),
    ("maj6", &[0, 4, 7, 9], &[]),
    ("min6", &[0, 3, 7, 9], &[]),
    ("majadd9", &[0, 4, 7, 14], &[14]),
    ("minadd9", &[0, 3, 7, 14], &[14]),
    ("maj6add9", &[0, 4, 7, 9, 14], &[14]),
    ("min6add9", &[0, 3, 7, 9, 14], &[14]),
    ("maj7", &[0, 4, 7, 11], &[]),
    ("min7", &[0, 3, 7, 10], &[]),
    ("min7b5", &[0, 3, 6, 10], &[]),
    ("minmaj7", &[0, 3, 7, 11], &[]),
    ("7", &[0, 4, 7, 10], &[]),
    ("7sus4", &[0, 5, 7, 10], &[]),
    ("dim7", &[0, 3, 6, 9], &[]),
    ("maj9", &[0, 4, 7, 11, 14], &[14]),
    ("min9", &[0, 3, 7, 10, 14], &[14]),
    ("9", &[0, 4, 7, 10, 14], &[14]),
    ("9b5", &[0, 4, 6, 10, 14], &[14]),
    ("9#5", &[0, 4, 8, 10, 14], &[14]),
    ("maj7#11", &[0, 4, 7, 11, 18], &[18]),
    ("maj9#11", &[0, 4, 7, 11, 14, 18], &[14, 18]),
    ("11", &[0, 4, 7, 10, 14, 17], &[14, 17]),
    ("min11", &[0, 3, 7, 10, 14, 17], &[14, 17]),
    ("13", &[0, 4, 7, 10, 14, 21], &[14, 21]),
    ("min13", &[0, 3, 7, 10, 14, 17, 21], &[14, 17, 21]),
    ("maj13", &[0, 4, 7, 11, 14, 21], &[14, 21]),
    ("7b5", &[0, 4, 6, 10], &[]),
    ("7#5", &[0, 4, 8, 10], &[]),
    ("7b9", &[0, 4, 7, 10, 13], &[13]),
    ("7#9", &[0, 4, 7, 10, 15], &[15]),
    ("7#11", &[0, 4, 7, 10, 18], &[18]),
    ("7alt", &[0, 4, 10, 13, 15, 18, 20], &[13, 15, 18, 20]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    scales: BTreeMap<String, Scale>,
    /// alias -> canonical scale name
    scale_aliases: BTreeMap<String, String>,
    qualities: BTreeMap<String, ChordQuality>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded default catalog.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (name, degrees, aliases) in BUILTIN_SCALES {
            let scale = Scale::from_degrees(*name, &degrees[..]).with_aliases(aliases.iter());
            for alias in &scale.aliases {
                catalog.scale_aliases.insert(alias.clone(), scale.name.clone());
            }
            catalog.scales.insert(scale.name.clone(), scale);
        }
        for (name, intervals, tensions) in BUILTIN_QUALITIES {
            let quality = ChordQuality::from_intervals(*name, &intervals[..]).with_tensions(&tensions[..]);
            catalog.qualities.insert(quality.name.clone(), quality);
        }
        debug!(
            scales = catalog.scales.len(),
            qualities = catalog.qualities.len(),
            "built-in catalog assembled"
        );
        catalog
    }

    /// Validate raw entries and build a catalog from them.
    pub fn from_entries(scales: Vec<ScaleEntry>, qualities: Vec<QualityEntry>) -> Result<Self> {
        let mut catalog = Self::new();
        for entry in scales {
            if entry.degrees.is_empty() {
                return Err(Error::EmptyDefinition {
                    kind: "scale",
                    name: entry.name,
                    field: "degrees",
                });
            }
            let scale = Scale::try_from_degrees(entry.name, &entry.degrees)?.with_aliases(&entry.aliases);
            catalog.insert_scale(scale)?;
        }
        for entry in qualities {
            if entry.intervals.is_empty() {
                return Err(Error::EmptyDefinition {
                    kind: "chord quality",
                    name: entry.name,
                    field: "intervals",
                });
            }
            for &value in &entry.tensions {
                validate_pc(value)?;
            }
            let quality = ChordQuality::try_from_intervals(entry.name, &entry.intervals)?
                .with_tensions(&entry.tensions);
            catalog.insert_quality(quality)?;
        }
        info!(
            scales = catalog.scales.len(),
            qualities = catalog.qualities.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse the two JSON entry lists (scales, chord qualities).
    pub fn from_json(scales_json: &str, qualities_json: &str) -> Result<Self> {
        let scales: Vec<ScaleEntry> = serde_json::from_str(scales_json)?;
        let qualities: Vec<QualityEntry> = serde_json::from_str(qualities_json)?;
        Self::from_entries(scales, qualities)
    }

    pub fn from_json_files(scales_path: &Path, qualities_path: &Path) -> Result<Self> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let scales = read(scales_path)?;
        let qualities = read(qualities_path)?;
        Self::from_json(&scales, &qualities)
    }

    /// Add a scale, rejecting any clash between its name/aliases and the
    /// names/aliases already present.
    pub fn insert_scale(&mut self, scale: Scale) -> Result<()> {
        let mut claimed = vec![scale.name.as_str()];
        claimed.extend(scale.aliases.iter().map(String::as_str).filter(|a| *a != scale.name));
        for name in claimed {
            if self.scales.contains_key(name) || self.scale_aliases.contains_key(name) {
                return Err(Error::DuplicateCatalogEntry {
                    kind: "scale",
                    name: name.to_string(),
                });
            }
        }
        for alias in &scale.aliases {
            if *alias != scale.name {
                self.scale_aliases.insert(alias.clone(), scale.name.clone());
            }
        }
        self.scales.insert(scale.name.clone(), scale);
        Ok(())
    }

    pub fn insert_quality(&mut self, quality: ChordQuality) -> Result<()> {
        if self.qualities.contains_key(&quality.name) {
            return Err(Error::DuplicateCatalogEntry {
                kind: "chord quality",
                name: quality.name,
            });
        }
        self.qualities.insert(quality.name.clone(), quality);
        Ok(())
    }

    /// Look up a scale by name or alias.
    pub fn scale(&self, name: &str) -> Option<&Scale> {
        self.scales.get(name).or_else(|| {
            self.scale_aliases
                .get(name)
                .and_then(|canonical| self.scales.get(canonical))
        })
    }

    pub fn quality(&self, name: &str) -> Option<&ChordQuality> {
        self.qualities.get(name)
    }

    pub fn require_scale(&self, name: &str) -> Result<&Scale> {
        self.scale(name).ok_or_else(|| Error::UnknownCatalogEntry {
            kind: "scale",
            name: name.to_string(),
        })
    }

    pub fn require_quality(&self, name: &str) -> Result<&ChordQuality> {
        self.quality(name).ok_or_else(|| Error::UnknownCatalogEntry {
            kind: "chord quality",
            name: name.to_string(),
        })
    }

    /// Scales in name order.
    pub fn scales(&self) -> impl Iterator<Item = &Scale> {
        self.scales.values()
    }

    /// Qualities in name order.
    pub fn qualities(&self) -> impl Iterator<Item = &ChordQuality> {
        self.qualities.values()
    }

    pub fn has_scale_name(&self, name: &str) -> bool {
        self.scale(name).is_some()
    }

    pub fn scale_count(&self) -> usize {
        self.scales.len()
    }

    pub fn quality_count(&self) -> usize {
        self.qualities.len()
    }

    /// First scale (in name order) with exactly these pitch classes.
    pub fn scale_with_mask(&self, mask: Mask) -> Option<&Scale> {
        self.scales().find(|scale| scale.mask == mask)
    }

    /// First quality (in name order) with exactly these intervals.
    pub fn quality_with_mask(&self, mask: Mask) -> Option<&ChordQuality> {
        self.qualities().find(|quality| quality.mask == mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_has_core_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.quality("min").unwrap().intervals, vec![0, 3, 7]);
        assert_eq!(catalog.quality("maj").unwrap().intervals, vec![0, 4, 7]);
        assert_eq!(catalog.quality("9").unwrap().tensions, vec![2]);
        assert_eq!(catalog.scale("major").unwrap().name, "Ionian");
        assert_eq!(catalog.scale("Natural Minor").unwrap().name, "Aeolian");
        assert_eq!(catalog.scale("Whole Tone").unwrap().symmetry_order(), 2);
        assert!(catalog.scale("Lydian Dominant").is_none());
    }

    #[test]
    fn altered_dominant_leaves_ionian() {
        let catalog = Catalog::builtin();
        let alt = catalog.quality("7alt").unwrap();
        let ionian = catalog.scale("Ionian").unwrap();
        assert!(!alt.mask_at(7).is_subset_of(ionian.mask));
    }

    #[test]
    fn from_json_accepts_optional_fields() {
        let catalog = Catalog::from_json(
            r#"[{"name": "Ionian", "degrees": [0, 2, 4, 5, 7, 9, 11], "aliases": ["major"]},
                {"name": "Pair", "degrees": [0, 6]}]"#,
            r#"[{"name": "maj", "intervals": [0, 4, 7]}]"#,
        )
        .unwrap();
        assert_eq!(catalog.scale_count(), 2);
        assert_eq!(catalog.quality_count(), 1);
        assert!(catalog.quality("maj").unwrap().tensions.is_empty());
    }

    #[test]
    fn rejects_empty_definitions() {
        let err = Catalog::from_json(r#"[{"name": "Nothing", "degrees": []}]"#, "[]").unwrap_err();
        assert!(matches!(err, Error::EmptyDefinition { field: "degrees", .. }));

        let err = Catalog::from_json("[]", r#"[{"name": "none", "intervals": []}]"#).unwrap_err();
        assert!(matches!(err, Error::EmptyDefinition { field: "intervals", .. }));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = Catalog::from_json(r#"[{"name": "Bad", "degrees": [0, 12]}]"#, "[]").unwrap_err();
        assert!(matches!(err, Error::PitchClassOutOfRange(12)));

        let err = Catalog::from_json(
            "[]",
            r#"[{"name": "bad", "intervals": [0, 4], "tensions": [-2]}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PitchClassOutOfRange(-2)));
    }

    #[test]
    fn rejects_duplicate_names_and_aliases() {
        let err = Catalog::from_json(
            r#"[{"name": "A", "degrees": [0]}, {"name": "A", "degrees": [1]}]"#,
            "[]",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateCatalogEntry { ref name, .. } if name == "A"));

        let err = Catalog::from_json(
            r#"[{"name": "A", "degrees": [0], "aliases": ["x"]},
                {"name": "B", "degrees": [1], "aliases": ["x"]}]"#,
            "[]",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateCatalogEntry { ref name, .. } if name == "x"));

        let err = Catalog::from_json(
            r#"[{"name": "A", "degrees": [0], "aliases": ["B"]},
                {"name": "B", "degrees": [1]}]"#,
            "[]",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateCatalogEntry { ref name, .. } if name == "B"));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(Catalog::from_json("{", "[]"), Err(Error::Json(_))));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let scales_path = dir.path().join("scales.json");
        let qualities_path = dir.path().join("chord_qualities.json");
        let mut f = std::fs::File::create(&scales_path).unwrap();
        writeln!(f, r#"[{{"name": "Whole Tone", "degrees": [0, 2, 4, 6, 8, 10]}}]"#).unwrap();
        std::fs::write(&qualities_path, r#"[{"name": "aug", "intervals": [0, 4, 8]}]"#).unwrap();

        let catalog = Catalog::from_json_files(&scales_path, &qualities_path).unwrap();
        assert_eq!(catalog.scale("Whole Tone").unwrap().degrees.len(), 6);

        let missing = Catalog::from_json_files(&dir.path().join("nope.json"), &qualities_path);
        assert!(matches!(missing, Err(Error::Io { .. })));
    }

    #[test]
    fn mask_lookups() {
        let catalog = Catalog::builtin();
        let triad = Mask::from_pcs(&[0, 3, 7]).unwrap();
        assert_eq!(catalog.quality_with_mask(triad).unwrap().name, "min");
        let major = Mask::from_pcs(&[0, 2, 4, 5, 7, 9, 11]).unwrap();
        assert_eq!(catalog.scale_with_mask(major).unwrap().name, "Ionian");
    }
}
