use anyhow::{bail, Context};
use tracing::info;

use chordspec::ChordParse;
use pcset::{
    Catalog, Chord, ChordQuality, ManualChordBuilder, ManualScaleBuilder, PitchClass, Registration, Scale,
    SessionOverlay, SpellingPref,
};
use tonalconf::TonalConfig;

use crate::chord_analysis::{analyze_chord, AnalysisOptions, ChordAnalysis};
use crate::compare::{compare_chord_qualities, ChordComparison};
use crate::compat::CompatibilityIndex;
use crate::functions::{generate_functions, FeatureSet, GeneratedFunction, GenerationOptions, Mode};
use crate::labels::IntervalLabelStyle;
use crate::scale_analysis::{analyze_scale, ScaleAnalysis, ScaleAnalysisOptions};
use crate::summary::{chord_brief, default_mappings, scale_overview, ChordBrief, OverviewSpelling, ScaleOverview};
use crate::{Error, Result};

/// Config strings resolved into typed values.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Defaults {
    prefer: SpellingPref,
    key_signature: Option<i8>,
    labels: IntervalLabelStyle,
    major_features: FeatureSet,
    minor_features: FeatureSet,
}

impl Defaults {
    fn resolve(config: &TonalConfig) -> Result<Self> {
        let prefer = config
            .spelling
            .prefer
            .parse::<SpellingPref>()
            .map_err(|_| Error::InvalidSetting {
                key: "spelling.prefer",
                value: config.spelling.prefer.clone(),
            })?;
        Ok(Self {
            prefer,
            key_signature: config.spelling.key_signature,
            labels: config.analysis.interval_labels.parse()?,
            major_features: FeatureSet::from_names(&config.functions.major_features)?,
            minor_features: FeatureSet::from_names(&config.functions.minor_features)?,
        })
    }
}

/// One handle over a catalog, the session's custom entries, and the
/// configured defaults.
///
/// Lookups and analyses run against the effective catalog: the base
/// catalog with session entries merged on top.
#[derive(Debug)]
pub struct TheoryEngine {
    base: Catalog,
    session: SessionOverlay,
    effective: Catalog,
    config: TonalConfig,
    defaults: Defaults,
    mappings: Vec<(Mode, Vec<GeneratedFunction>)>,
    index: CompatibilityIndex,
}

impl TheoryEngine {
    /// Engine over `catalog` with default settings.
    pub fn new(catalog: Catalog) -> Self {
        let config = TonalConfig::default();
        let defaults = Defaults {
            prefer: SpellingPref::Auto,
            key_signature: None,
            labels: IntervalLabelStyle::Numeric,
            major_features: Mode::Major.default_features(),
            minor_features: Mode::Minor.default_features(),
        };
        Self::assemble(catalog, config, defaults)
    }

    /// Engine over `catalog` with settings taken from `config`.
    pub fn with_config(catalog: Catalog, config: TonalConfig) -> Result<Self> {
        let defaults = Defaults::resolve(&config)?;
        Ok(Self::assemble(catalog, config, defaults))
    }

    /// Build from a loaded configuration, reading catalog files when the
    /// config names them.
    pub fn from_config(config: TonalConfig) -> anyhow::Result<Self> {
        let catalog = match (&config.catalog.scales_path, &config.catalog.chords_path) {
            (None, None) => Catalog::builtin(),
            (Some(scales), Some(chords)) => Catalog::from_json_files(scales, chords).with_context(|| {
                format!(
                    "loading catalog from {} and {}",
                    scales.display(),
                    chords.display()
                )
            })?,
            _ => bail!("catalog.scales_path and catalog.chords_path must be set together"),
        };
        Self::with_config(catalog, config).context("applying configuration")
    }

    /// Load configuration from the usual locations, then build.
    pub fn load() -> anyhow::Result<Self> {
        let config = TonalConfig::load().context("loading tonality configuration")?;
        Self::from_config(config)
    }

    fn assemble(base: Catalog, config: TonalConfig, defaults: Defaults) -> Self {
        let mappings = default_mappings(&base);
        info!(
            scales = base.scale_count(),
            qualities = base.quality_count(),
            "theory engine ready"
        );
        Self {
            effective: base.clone(),
            base,
            session: SessionOverlay::new(),
            config,
            defaults,
            mappings,
            index: CompatibilityIndex::new(),
        }
    }

    /// Base catalog plus session entries.
    pub fn catalog(&self) -> &Catalog {
        &self.effective
    }

    pub fn base_catalog(&self) -> &Catalog {
        &self.base
    }

    pub fn session(&self) -> &SessionOverlay {
        &self.session
    }

    pub fn config(&self) -> &TonalConfig {
        &self.config
    }

    fn refresh(&mut self) {
        self.effective = self.session.apply(&self.base);
    }

    pub fn register_scale(&mut self, builder: &ManualScaleBuilder) -> Result<Registration<Scale>> {
        let registration = self.session.register_scale(builder, &self.base)?;
        self.refresh();
        Ok(registration)
    }

    pub fn register_chord(&mut self, builder: &ManualChordBuilder) -> Result<Registration<ChordQuality>> {
        let registration = self.session.register_chord(builder, &self.base)?;
        self.refresh();
        Ok(registration)
    }

    pub fn scale(&self, name: &str) -> Result<&Scale> {
        self.effective.scale(name).ok_or_else(|| Error::UnknownScale {
            name: name.to_string(),
        })
    }

    pub fn quality(&self, name: &str) -> Result<&ChordQuality> {
        self.effective.quality(name).ok_or_else(|| Error::UnknownQuality {
            name: name.to_string(),
        })
    }

    pub fn chord(&self, root_pc: PitchClass, quality: &str) -> Result<Chord> {
        Ok(Chord::from_quality(root_pc, self.quality(quality)?.clone())?)
    }

    pub fn parse(&self, text: &str) -> Result<ChordParse> {
        Ok(chordspec::parse(text, &self.effective)?)
    }

    /// Analysis options seeded from configuration.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            tonic_pc: None,
            prefer: self.defaults.prefer,
            key_signature: self.defaults.key_signature,
            include_inversions: self.config.analysis.include_inversions,
            include_voicings: self.config.analysis.include_voicings,
            include_enharmonics: self.config.analysis.include_enharmonics,
            interval_labels: self.defaults.labels,
        }
    }

    pub fn analyze_chord(&self, chord: &Chord, tonic_pc: Option<PitchClass>) -> ChordAnalysis {
        let options = AnalysisOptions {
            tonic_pc: tonic_pc.map(|pc| pc % 12),
            ..self.analysis_options()
        };
        analyze_chord(chord, &options)
    }

    /// Parse a chord expression and analyze the chord it names.
    pub fn analyze_spec(&self, text: &str, tonic_pc: Option<PitchClass>) -> Result<ChordAnalysis> {
        let chord = self.parse(text)?.to_chord()?;
        Ok(self.analyze_chord(&chord, tonic_pc))
    }

    pub fn analyze_scale(&self, name: &str, tonic_pc: Option<PitchClass>) -> Result<ScaleAnalysis> {
        let options = ScaleAnalysisOptions {
            tonic_pc: tonic_pc.map(|pc| pc % 12),
            prefer: self.defaults.prefer,
            key_signature: self.defaults.key_signature,
            ..ScaleAnalysisOptions::default()
        };
        Ok(analyze_scale(self.scale(name)?, &options))
    }

    /// Generation options for `mode` seeded from configuration.
    pub fn generation_options(&self, mode: Mode) -> GenerationOptions {
        GenerationOptions {
            features: match mode {
                Mode::Major => self.defaults.major_features,
                Mode::Minor => self.defaults.minor_features,
            },
            include_nondiatonic: self.config.functions.include_nondiatonic,
            tonic: 0,
        }
    }

    /// Functional mapping of the named scale, transposed to `tonic_pc`.
    pub fn generate_functions(&self, scale: &str, mode: Mode, tonic_pc: PitchClass) -> Result<Vec<GeneratedFunction>> {
        let tonic = tonic_pc % 12;
        let scale = self.scale(scale)?;
        let keyed = if tonic == 0 { scale.clone() } else { scale.transpose(tonic as i32) };
        let options = GenerationOptions {
            tonic,
            ..self.generation_options(mode)
        };
        Ok(generate_functions(&keyed, &self.effective, mode.templates(), &options))
    }

    pub fn compare(&self, quality_a: &str, quality_b: &str, include: Option<&[&str]>) -> Result<ChordComparison> {
        Ok(compare_chord_qualities(
            self.quality(quality_a)?,
            self.quality(quality_b)?,
            self.effective.scales(),
            include,
            &self.index,
        ))
    }

    pub fn brief(&self, quality: &str, max_scales: usize) -> Result<ChordBrief> {
        Ok(chord_brief(
            self.quality(quality)?,
            self.effective.scales(),
            &self.mappings,
            max_scales,
            &self.index,
        ))
    }

    pub fn scale_overview(&self, scale: &str, tonic_pc: Option<PitchClass>) -> Result<ScaleOverview> {
        let spelling = tonic_pc.map(|tonic| OverviewSpelling {
            tonic_pc: tonic % 12,
            prefer: self.defaults.prefer,
            key_signature: self.defaults.key_signature,
        });
        Ok(scale_overview(
            self.scale(scale)?,
            self.effective.qualities(),
            spelling.as_ref(),
            &self.index,
        ))
    }
}

impl Default for TheoryEngine {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_entries_join_the_effective_catalog() {
        let mut engine = TheoryEngine::default();
        let reg = engine
            .register_chord(&ManualChordBuilder::new([0, 4, 6]).named("lyd3"))
            .unwrap();
        assert!(!reg.is_match());
        assert!(engine.quality("lyd3").is_ok());
        assert!(engine.base_catalog().quality("lyd3").is_none());
        assert_eq!(engine.parse("lyd3").unwrap().spec.intervals, vec![0, 4, 6]);
    }

    #[test]
    fn unknown_names_are_typed() {
        let engine = TheoryEngine::default();
        assert!(matches!(engine.scale("Nope"), Err(Error::UnknownScale { .. })));
        assert!(matches!(engine.brief("nope", 3), Err(Error::UnknownQuality { .. })));
        assert_eq!(
            engine.parse("[0,4").unwrap_err().kind(),
            pcset::ErrorKind::Parse
        );
    }

    #[test]
    fn config_strings_are_validated() {
        let mut config = TonalConfig::default();
        config.functions.major_features.push("sparkle".to_string());
        assert!(matches!(
            TheoryEngine::with_config(Catalog::builtin(), config),
            Err(Error::UnknownFeature { .. })
        ));

        let mut config = TonalConfig::default();
        config.analysis.interval_labels = "roman".to_string();
        assert!(matches!(
            TheoryEngine::with_config(Catalog::builtin(), config),
            Err(Error::InvalidSetting { key: "interval_labels", .. })
        ));
    }

    #[test]
    fn functions_in_another_key() {
        let engine = TheoryEngine::default();
        let functions = engine.generate_functions("Ionian", Mode::Major, 7).unwrap();
        let v = functions.iter().find(|f| f.modal_label == "V").unwrap();
        assert_eq!(v.degree_pc, 2);
        assert!(v.is_diatonic());
    }
}
