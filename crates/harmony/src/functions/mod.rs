//! Functional-harmony mappings generated from templates.
//!
//! A template places chord variants on a scale degree with a harmonic
//! role. Generation keeps the variants whose required features are
//! enabled, builds each chord, and checks it against the scale: chords
//! outside the scale lose their `diatonic` tag and gain `borrowed`.

pub mod features;
pub mod templates;

pub use features::{Feature, FeatureSet, Tag, DEFAULT_FEATURES_MAJOR, DEFAULT_FEATURES_MINOR};
pub use templates::{FunctionTemplate, FunctionVariant, TEMPLATES_MAJOR, TEMPLATES_MINOR};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use pcset::{Catalog, Mask, PitchClass, Scale};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tonic,
    Predominant,
    Dominant,
    /// Tonic-function chord that extends the tonic rather than replacing it.
    TonicProlongation,
}

impl Role {
    /// The three-way role a template role reports as.
    pub fn canonical(self) -> Role {
        match self {
            Role::TonicProlongation => Role::Tonic,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Tonic => "tonic",
            Role::Predominant => "predominant",
            Role::Dominant => "dominant",
            Role::TonicProlongation => "tonic_prolongation",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub fn templates(self) -> &'static [FunctionTemplate] {
        match self {
            Mode::Major => TEMPLATES_MAJOR,
            Mode::Minor => TEMPLATES_MINOR,
        }
    }

    pub fn default_features(self) -> FeatureSet {
        match self {
            Mode::Major => DEFAULT_FEATURES_MAJOR,
            Mode::Minor => DEFAULT_FEATURES_MINOR,
        }
    }

    /// Catalog scale the default mapping for this mode is built against.
    pub fn reference_scale(self) -> &'static str {
        match self {
            Mode::Major => "Ionian",
            Mode::Minor => "Aeolian",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Mode::Major),
            "minor" => Ok(Mode::Minor),
            _ => Err(Error::InvalidSetting {
                key: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// `diatonic` is implied whether or not it is listed.
    pub features: FeatureSet,
    pub include_nondiatonic: bool,
    /// Pitch class the template degrees are measured from. The scale
    /// passed alongside must already be in this key. Reduced mod 12.
    pub tonic: PitchClass,
}

impl GenerationOptions {
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            features: mode.default_features(),
            include_nondiatonic: true,
            tonic: 0,
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features = self.features.with(feature);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFunction {
    pub degree_pc: PitchClass,
    pub chord_quality: String,
    pub intervals: Vec<PitchClass>,
    pub role: Role,
    pub modal_label: String,
    pub role_subtype: Option<Role>,
    /// Sorted by name.
    pub tags: Vec<Tag>,
}

impl GeneratedFunction {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_diatonic(&self) -> bool {
        self.has_tag(Tag::DIATONIC)
    }
}

/// Resolve `templates` against `scale`, in template then variant order.
///
/// Variants naming a quality the catalog doesn't define are skipped.
pub fn generate_functions(
    scale: &Scale,
    catalog: &Catalog,
    templates: &[FunctionTemplate],
    options: &GenerationOptions,
) -> Vec<GeneratedFunction> {
    let enabled = options.features.with(Feature::Diatonic);
    let mut results = Vec::new();

    for template in templates {
        let degree_pc = (template.degree + options.tonic % 12) % 12;
        for variant in template
            .variants
            .iter()
            .filter(|v| v.requires.is_subset_of(enabled))
        {
            let Some(quality) = catalog.quality(variant.quality) else {
                debug!(
                    quality = variant.quality,
                    label = variant.modal_label,
                    "skipping variant with unknown quality"
                );
                continue;
            };

            let chord_mask: Mask = quality.mask_at(degree_pc);
            let diatonic = chord_mask.is_subset_of(scale.mask);
            if !diatonic && !options.include_nondiatonic {
                continue;
            }

            let mut tags = variant.tags();
            if !diatonic {
                tags.retain(|t| *t != Tag::DIATONIC);
                tags.push(Tag::Borrowed);
            }
            // modal mixture never counts as diatonic, whatever the mask says
            if tags.contains(&Tag::ModalMix) {
                tags.retain(|t| *t != Tag::DIATONIC);
            }
            tags.sort();
            tags.dedup();

            results.push(GeneratedFunction {
                degree_pc,
                chord_quality: variant.quality.to_string(),
                intervals: quality.intervals.clone(),
                role: variant.role.canonical(),
                modal_label: variant.modal_label.to_string(),
                role_subtype: (variant.role == Role::TonicProlongation).then_some(variant.role),
                tags,
            });
        }
    }

    results
}

/// Default mapping for `mode`, built against the catalog's reference scale
/// with the mode's default features and borrowed chords included.
pub fn function_mappings(mode: Mode, catalog: &Catalog) -> Result<Vec<GeneratedFunction>> {
    let scale = catalog.require_scale(mode.reference_scale())?;
    Ok(generate_functions(
        scale,
        catalog,
        mode.templates(),
        &GenerationOptions::for_mode(mode),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ionian() -> (Catalog, Scale) {
        let catalog = Catalog::builtin();
        let scale = catalog.scale("Ionian").unwrap().clone();
        (catalog, scale)
    }

    #[test]
    fn nondiatonic_variants_can_be_excluded() {
        let (catalog, scale) = ionian();
        let options = GenerationOptions {
            include_nondiatonic: false,
            ..GenerationOptions::for_mode(Mode::Major).with_feature(Feature::AlteredDominant)
        };
        let generated = generate_functions(&scale, &catalog, TEMPLATES_MAJOR, &options);
        assert!(generated.iter().all(|f| !f.has_tag(Tag::Borrowed)));
        assert!(generated.iter().all(|f| f.chord_quality != "7alt"));
    }

    #[test]
    fn tonic_prolongation_reports_as_tonic() {
        let (catalog, scale) = ionian();
        let generated =
            generate_functions(&scale, &catalog, TEMPLATES_MAJOR, &GenerationOptions::for_mode(Mode::Major));
        let iii = generated.iter().find(|f| f.modal_label == "iii").unwrap();
        assert_eq!(iii.role, Role::Tonic);
        assert_eq!(iii.role_subtype, Some(Role::TonicProlongation));
        assert_eq!(iii.degree_pc, 4);
    }

    #[test]
    fn missing_quality_is_skipped() {
        let mut catalog = Catalog::new();
        catalog
            .insert_quality(pcset::ChordQuality::from_intervals("maj", &[0, 4, 7]))
            .unwrap();
        let scale = Scale::from_degrees("Ionian", &[0, 2, 4, 5, 7, 9, 11]);
        let generated =
            generate_functions(&scale, &catalog, TEMPLATES_MAJOR, &GenerationOptions::for_mode(Mode::Major));
        let labels: Vec<&str> = generated.iter().map(|f| f.modal_label.as_str()).collect();
        assert_eq!(labels, vec!["I", "IV", "V"]);
    }

    #[test]
    fn tonic_offset_moves_degrees() {
        let (catalog, scale) = ionian();
        let options = GenerationOptions {
            tonic: 2,
            ..GenerationOptions::for_mode(Mode::Major)
        };
        let d_major = scale.transpose(2);
        let generated = generate_functions(&d_major, &catalog, TEMPLATES_MAJOR, &options);
        let v7 = generated.iter().find(|f| f.modal_label == "V7").unwrap();
        assert_eq!(v7.degree_pc, 9);
        assert!(v7.is_diatonic());
    }

    #[test]
    fn unreduced_tonic_wraps() {
        let (catalog, scale) = ionian();
        let options = GenerationOptions {
            tonic: 254,
            ..GenerationOptions::for_mode(Mode::Major)
        };
        let d_major = scale.transpose(2);
        let generated = generate_functions(&d_major, &catalog, TEMPLATES_MAJOR, &options);
        let v7 = generated.iter().find(|f| f.modal_label == "V7").unwrap();
        assert_eq!(v7.degree_pc, 9);
        assert!(v7.is_diatonic());
    }

    #[test]
    fn mode_names() {
        assert_eq!("Minor".parse::<Mode>().unwrap(), Mode::Minor);
        assert!("dorian".parse::<Mode>().is_err());
    }
}
