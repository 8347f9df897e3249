//! Session-scoped custom scales and chord qualities.
//!
//! Nothing here is global. A [`SessionOverlay`] is owned by whoever drives
//! the session and is merged over a base [`Catalog`] with
//! [`SessionOverlay::apply`] when a call needs to see the custom entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::mask::Mask;
use crate::pitch::{Pitch, Scope};
use crate::quality::ChordQuality;
use crate::scale::Scale;
use crate::spelling::pc_from_name;
use crate::{PitchClass, Result};

/// A degree or interval given either as a number (reduced mod 12) or as a
/// note name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PcInput {
    Number(i64),
    Name(String),
}

impl PcInput {
    pub fn resolve(&self) -> Result<PitchClass> {
        match self {
            PcInput::Number(value) => Ok(value.rem_euclid(12) as PitchClass),
            PcInput::Name(name) => pc_from_name(name),
        }
    }
}

impl From<i64> for PcInput {
    fn from(value: i64) -> Self {
        PcInput::Number(value)
    }
}

impl From<i32> for PcInput {
    fn from(value: i32) -> Self {
        PcInput::Number(value as i64)
    }
}

impl From<u8> for PcInput {
    fn from(value: u8) -> Self {
        PcInput::Number(value as i64)
    }
}

impl From<&str> for PcInput {
    fn from(value: &str) -> Self {
        PcInput::Name(value.to_string())
    }
}

impl From<String> for PcInput {
    fn from(value: String) -> Self {
        PcInput::Name(value)
    }
}

fn resolve_all(inputs: &[PcInput]) -> Result<Mask> {
    let mut pcs = Vec::with_capacity(inputs.len());
    for input in inputs {
        pcs.push(input.resolve()?);
    }
    Ok(pcs.into_iter().collect())
}

/// Where a custom entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuilderContext {
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absolute_midi: Vec<i32>,
}

impl BuilderContext {
    /// Name-only inputs imply note scope unless a scope was set explicitly.
    fn derive(explicit: Option<&BuilderContext>, inputs: &[PcInput]) -> BuilderContext {
        if let Some(context) = explicit {
            return context.clone();
        }
        let names: Vec<String> = inputs
            .iter()
            .filter_map(|input| match input {
                PcInput::Name(name) => Some(name.trim().to_string()),
                PcInput::Number(_) => None,
            })
            .collect();
        if !inputs.is_empty() && names.len() == inputs.len() {
            BuilderContext {
                scope: Scope::Note,
                tokens: names,
                absolute_midi: Vec::new(),
            }
        } else {
            BuilderContext::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManualScaleBuilder {
    pub name: Option<String>,
    pub degrees: Vec<PcInput>,
    pub context: Option<BuilderContext>,
}

impl ManualScaleBuilder {
    pub fn new<I, T>(degrees: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PcInput>,
    {
        Self {
            name: None,
            degrees: degrees.into_iter().map(Into::into).collect(),
            context: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_context(mut self, scope: Scope, tokens: Vec<String>, absolute: &[Pitch]) -> Self {
        self.context = Some(BuilderContext {
            scope,
            tokens,
            absolute_midi: absolute.iter().map(|p| p.midi).collect(),
        });
        self
    }

    pub fn mask(&self) -> Result<Mask> {
        resolve_all(&self.degrees)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManualChordBuilder {
    pub name: Option<String>,
    pub intervals: Vec<PcInput>,
    pub tensions: Vec<PcInput>,
    pub context: Option<BuilderContext>,
}

impl ManualChordBuilder {
    pub fn new<I, T>(intervals: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PcInput>,
    {
        Self {
            name: None,
            intervals: intervals.into_iter().map(Into::into).collect(),
            tensions: Vec::new(),
            context: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tensions<I, T>(mut self, tensions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PcInput>,
    {
        self.tensions = tensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context(mut self, scope: Scope, tokens: Vec<String>, absolute: &[Pitch]) -> Self {
        self.context = Some(BuilderContext {
            scope,
            tokens,
            absolute_midi: absolute.iter().map(|p| p.midi).collect(),
        });
        self
    }

    pub fn mask(&self) -> Result<Mask> {
        resolve_all(&self.intervals)
    }
}

/// Outcome of registering a builder: the entry now in the session, every
/// catalog entry with identical pitch content (empty when a new entry was
/// created), and the builder's context.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration<T> {
    pub entry: T,
    pub matches: Vec<T>,
    pub context: BuilderContext,
}

impl<T> Registration<T> {
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOverlay {
    scales: BTreeMap<String, Scale>,
    qualities: BTreeMap<String, ChordQuality>,
    scale_context: BTreeMap<String, BuilderContext>,
    chord_context: BTreeMap<String, BuilderContext>,
}

/// First `{stem}-{n}` (n from 1) not claimed according to `taken`.
fn placeholder_name(stem: &str, taken: impl Fn(&str) -> bool) -> String {
    (1usize..)
        .map(|idx| format!("{stem}-{idx}"))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or_else(|| stem.to_string())
}

impl SessionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom scale. A catalog scale with the same pitch classes
    /// is reused instead of creating a new entry.
    pub fn register_scale(
        &mut self,
        builder: &ManualScaleBuilder,
        catalog: &Catalog,
    ) -> Result<Registration<Scale>> {
        let mask = builder.mask()?;
        let context = BuilderContext::derive(builder.context.as_ref(), &builder.degrees);

        let matches: Vec<Scale> = catalog
            .scales()
            .filter(|scale| scale.mask == mask)
            .cloned()
            .collect();
        if let Some(found) = matches.first() {
            debug!(scale = %found.name, "manual scale matched catalog entry");
            self.scales.insert(found.name.clone(), found.clone());
            return Ok(Registration {
                entry: found.clone(),
                matches,
                context,
            });
        }

        let requested = builder.name.clone();
        let clashes = |name: &str| catalog.has_scale_name(name) || self.scales.contains_key(name);
        let name = match requested {
            Some(name) if !clashes(&name) => name,
            _ => placeholder_name("ManualScale", clashes),
        };
        let scale = Scale::from_degrees(name, &mask.pcs());
        info!(scale = %scale.name, degrees = ?scale.degrees, "registered session scale");
        self.scales.insert(scale.name.clone(), scale.clone());
        self.scale_context.insert(scale.name.clone(), context.clone());
        Ok(Registration {
            entry: scale,
            matches: Vec::new(),
            context,
        })
    }

    /// Register a custom chord quality. A catalog quality with the same
    /// intervals is reused instead of creating a new entry.
    pub fn register_chord(
        &mut self,
        builder: &ManualChordBuilder,
        catalog: &Catalog,
    ) -> Result<Registration<ChordQuality>> {
        let mask = builder.mask()?;
        let tensions = resolve_all(&builder.tensions)?;
        let context = BuilderContext::derive(builder.context.as_ref(), &builder.intervals);

        let matches: Vec<ChordQuality> = catalog
            .qualities()
            .filter(|quality| quality.mask == mask)
            .cloned()
            .collect();
        if let Some(found) = matches.first() {
            debug!(quality = %found.name, "manual chord matched catalog entry");
            self.qualities.insert(found.name.clone(), found.clone());
            return Ok(Registration {
                entry: found.clone(),
                matches,
                context,
            });
        }

        let requested = builder.name.clone();
        let clashes =
            |name: &str| catalog.quality(name).is_some() || self.qualities.contains_key(name);
        let name = match requested {
            Some(name) if !clashes(&name) => name,
            _ => placeholder_name("ManualChord", clashes),
        };
        let quality = ChordQuality::from_intervals(name, &mask.pcs()).with_tensions(&tensions.pcs());
        info!(quality = %quality.name, intervals = ?quality.intervals, "registered session chord");
        self.qualities.insert(quality.name.clone(), quality.clone());
        self.chord_context.insert(quality.name.clone(), context.clone());
        Ok(Registration {
            entry: quality,
            matches: Vec::new(),
            context,
        })
    }

    pub fn is_session_scale(&self, name: &str) -> bool {
        self.scales.contains_key(name)
    }

    pub fn is_session_chord(&self, name: &str) -> bool {
        self.qualities.contains_key(name)
    }

    pub fn scale_context(&self, name: &str) -> Option<&BuilderContext> {
        self.scale_context.get(name)
    }

    pub fn chord_context(&self, name: &str) -> Option<&BuilderContext> {
        self.chord_context.get(name)
    }

    pub fn scales(&self) -> impl Iterator<Item = &Scale> {
        self.scales.values()
    }

    pub fn qualities(&self) -> impl Iterator<Item = &ChordQuality> {
        self.qualities.values()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty() && self.qualities.is_empty()
    }

    /// A new catalog holding `base` plus every session entry whose name the
    /// base doesn't already define.
    pub fn apply(&self, base: &Catalog) -> Catalog {
        let mut merged = base.clone();
        for scale in self.scales.values() {
            if merged.has_scale_name(&scale.name) {
                continue;
            }
            if let Err(err) = merged.insert_scale(scale.clone()) {
                debug!(scale = %scale.name, error = %err, "session scale not merged");
            }
        }
        for quality in self.qualities.values() {
            if merged.quality(&quality.name).is_some() {
                continue;
            }
            if let Err(err) = merged.insert_quality(quality.clone()) {
                debug!(quality = %quality.name, error = %err, "session chord not merged");
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_matching_catalog_is_reused() {
        let catalog = Catalog::builtin();
        let mut session = SessionOverlay::new();
        let reg = session
            .register_scale(&ManualScaleBuilder::new([0, 2, 4, 5, 7, 9, 11]), &catalog)
            .unwrap();
        assert!(reg.is_match());
        assert_eq!(reg.entry.name, "Ionian");
        assert!(session.is_session_scale("Ionian"));
    }

    #[test]
    fn unknown_scale_gets_placeholder() {
        let catalog = Catalog::builtin();
        let mut session = SessionOverlay::new();
        let reg = session
            .register_scale(&ManualScaleBuilder::new([0, 1, 4, 5, 8]), &catalog)
            .unwrap();
        assert!(!reg.is_match());
        assert_eq!(reg.entry.name, "ManualScale-1");
        assert_eq!(reg.entry.degrees, vec![0, 1, 4, 5, 8]);
        assert_eq!(session.scale_context("ManualScale-1").unwrap().scope, Scope::Abstract);

        let second = session
            .register_scale(&ManualScaleBuilder::new([0, 1, 4, 6]), &catalog)
            .unwrap();
        assert_eq!(second.entry.name, "ManualScale-2");
    }

    #[test]
    fn clashing_name_falls_back_to_placeholder() {
        let catalog = Catalog::builtin();
        let mut session = SessionOverlay::new();
        let reg = session
            .register_scale(&ManualScaleBuilder::new([0, 1, 2]).named("Dorian"), &catalog)
            .unwrap();
        assert_eq!(reg.entry.name, "ManualScale-1");
    }

    #[test]
    fn note_name_inputs() {
        let catalog = Catalog::new();
        let mut session = SessionOverlay::new();
        let reg = session
            .register_scale(&ManualScaleBuilder::new(["C", "E", "G"]).named("NoteScale"), &catalog)
            .unwrap();
        assert_eq!(reg.entry.degrees, vec![0, 4, 7]);
        assert_eq!(reg.context.scope, Scope::Note);
        assert_eq!(reg.context.tokens, vec!["C", "E", "G"]);
    }

    #[test]
    fn chord_registration_and_context() {
        let catalog = Catalog::builtin();
        let mut session = SessionOverlay::new();

        let matched = session
            .register_chord(&ManualChordBuilder::new(["C", "Eb", "G"]), &catalog)
            .unwrap();
        assert_eq!(matched.entry.name, "min");

        let absolute = [
            Pitch::from_components(0, 3),
            Pitch::from_components(1, 3),
            Pitch::from_components(4, 3),
        ];
        let builder = ManualChordBuilder::new([0, 1, 4]).named("AbsChord").with_context(
            Scope::Absolute,
            vec!["C3".into(), "Db3".into(), "E3".into()],
            &absolute,
        );
        let reg = session.register_chord(&builder, &catalog).unwrap();
        assert_eq!(reg.entry.name, "AbsChord");
        let context = session.chord_context("AbsChord").unwrap();
        assert_eq!(context.scope, Scope::Absolute);
        assert_eq!(context.absolute_midi, vec![48, 49, 52]);
    }

    #[test]
    fn bad_note_name_is_an_error() {
        let mut session = SessionOverlay::new();
        let result = session.register_chord(&ManualChordBuilder::new(["C", "X"]), &Catalog::new());
        assert!(result.is_err());
        assert!(session.is_empty());
    }

    #[test]
    fn apply_merges_without_touching_base() {
        let base = Catalog::builtin();
        let mut session = SessionOverlay::new();
        session
            .register_scale(&ManualScaleBuilder::new([0, 2, 5, 6, 9]).named("CustomScale"), &base)
            .unwrap();
        session
            .register_chord(
                &ManualChordBuilder::new([0, 2, 5, 9]).named("CustomChord").with_tensions([14]),
                &base,
            )
            .unwrap();

        let merged = session.apply(&base);
        assert!(merged.scale("CustomScale").is_some());
        assert_eq!(merged.quality("CustomChord").unwrap().tensions, vec![2]);
        assert!(base.scale("CustomScale").is_none());
        assert_eq!(merged.scale_count(), base.scale_count() + 1);
    }
}
