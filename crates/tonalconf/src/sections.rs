//! Configuration sections. Each maps to one `[table]` in the TOML file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Accepted spellings for `[spelling] prefer`.
pub const SPELLING_VALUES: &[&str] = &["auto", "sharps", "sharp", "flats", "flat"];

/// Accepted values for `[analysis] interval_labels`.
pub const INTERVAL_LABEL_VALUES: &[&str] = &["numeric", "classical"];

/// Key signatures run from seven flats to seven sharps.
pub const KEY_SIGNATURE_RANGE: std::ops::RangeInclusive<i64> = -7..=7;

/// External catalog files. Unset paths fall back to the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub scales_path: Option<PathBuf>,

    #[serde(default)]
    pub chords_path: Option<PathBuf>,
}

/// Enharmonic naming defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingConfig {
    /// `auto`, `sharps`, or `flats`.
    /// Default: auto
    #[serde(default = "SpellingConfig::default_prefer")]
    pub prefer: String,

    /// Positive for sharps, negative for flats. Overrides `prefer` when set.
    #[serde(default)]
    pub key_signature: Option<i8>,
}

impl SpellingConfig {
    fn default_prefer() -> String {
        "auto".to_string()
    }
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            prefer: Self::default_prefer(),
            key_signature: None,
        }
    }
}

/// Which optional sections a chord analysis report carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// `numeric` or `classical`.
    /// Default: numeric
    #[serde(default = "AnalysisConfig::default_interval_labels")]
    pub interval_labels: String,

    #[serde(default = "default_true")]
    pub include_inversions: bool,

    #[serde(default = "default_true")]
    pub include_voicings: bool,

    #[serde(default = "default_true")]
    pub include_enharmonics: bool,
}

impl AnalysisConfig {
    fn default_interval_labels() -> String {
        "numeric".to_string()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interval_labels: Self::default_interval_labels(),
            include_inversions: true,
            include_voicings: true,
            include_enharmonics: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Functional-harmony generation defaults.
///
/// Feature names are validated by the generator, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionsConfig {
    #[serde(default = "FunctionsConfig::default_major_features")]
    pub major_features: Vec<String>,

    #[serde(default = "FunctionsConfig::default_minor_features")]
    pub minor_features: Vec<String>,

    /// Keep borrowed (non-diatonic) variants.
    /// Default: true
    #[serde(default = "default_true")]
    pub include_nondiatonic: bool,
}

impl FunctionsConfig {
    fn default_major_features() -> Vec<String> {
        ["diatonic", "sixth_chords", "added_tones", "suspended", "extended"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn default_minor_features() -> Vec<String> {
        [
            "diatonic",
            "added_tones",
            "suspended",
            "extended",
            "leading_tone",
            "parallel_major",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            major_features: Self::default_major_features(),
            minor_features: Self::default_minor_features(),
            include_nondiatonic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (trace, debug, info, warn, error).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
