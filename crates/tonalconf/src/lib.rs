//! Configuration loading for the tonality crates.
//!
//! Settings here are defaults for the analysis and generation entry points:
//! which catalog files to load, how to spell notes, which report sections to
//! compute, and which functional-harmony features are on. Callers can always
//! override them per request.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tonalconf::TonalConfig;
//!
//! let config = TonalConfig::load().expect("Failed to load config");
//! println!("spelling: {}", config.spelling.prefer);
//! for feature in &config.functions.major_features {
//!     println!("major feature: {}", feature);
//! }
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins, key by key):
//! 1. `/etc/tonality/config.toml` (system)
//! 2. `~/.config/tonality/config.toml` (user)
//! 3. `./tonality.toml` (local override)
//! 4. Environment variables (`TONALITY_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [catalog]
//! scales_path = "~/theory/scales.json"
//! chords_path = "~/theory/chords.json"
//!
//! [spelling]
//! prefer = "flats"
//! key_signature = -2
//!
//! [analysis]
//! interval_labels = "classical"
//! include_voicings = false
//!
//! [functions]
//! major_features = ["diatonic", "sixth_chords", "altered_dominant"]
//! include_nondiatonic = true
//!
//! [telemetry]
//! log_level = "debug"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};
pub use sections::{AnalysisConfig, CatalogConfig, FunctionsConfig, SpellingConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key} in {path}: {message}")]
    InvalidValue {
        path: PathBuf,
        key: String,
        message: String,
    },
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonalConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub spelling: SpellingConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub functions: FunctionsConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl TonalConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with `config_path` standing in for the local
    /// `./tonality.toml`. System and user configs still load first.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    pub fn load_with_sources_from(config_path: Option<&Path>) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = TonalConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to a TOML string that loads back to the same values.
    pub fn to_toml(&self) -> String {
        // Built by hand for stable ordering and comments
        let mut output = String::new();

        output.push_str("# Tonality Configuration\n\n");

        output.push_str("[catalog]\n");
        push_optional_path(&mut output, "scales_path", self.catalog.scales_path.as_deref());
        push_optional_path(&mut output, "chords_path", self.catalog.chords_path.as_deref());

        output.push_str("\n[spelling]\n");
        output.push_str(&format!("prefer = {}\n", quoted(&self.spelling.prefer)));
        match self.spelling.key_signature {
            Some(ks) => output.push_str(&format!("key_signature = {}\n", ks)),
            None => output.push_str("# key_signature = 0\n"),
        }

        output.push_str("\n[analysis]\n");
        output.push_str(&format!(
            "interval_labels = {}\n",
            quoted(&self.analysis.interval_labels)
        ));
        output.push_str(&format!(
            "include_inversions = {}\n",
            self.analysis.include_inversions
        ));
        output.push_str(&format!(
            "include_voicings = {}\n",
            self.analysis.include_voicings
        ));
        output.push_str(&format!(
            "include_enharmonics = {}\n",
            self.analysis.include_enharmonics
        ));

        output.push_str("\n[functions]\n");
        output.push_str(&format!(
            "major_features = {}\n",
            string_list(&self.functions.major_features)
        ));
        output.push_str(&format!(
            "minor_features = {}\n",
            string_list(&self.functions.minor_features)
        ));
        output.push_str(&format!(
            "include_nondiatonic = {}\n",
            self.functions.include_nondiatonic
        ));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = {}\n", quoted(&self.telemetry.log_level)));

        output
    }
}

fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

fn string_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| quoted(v)).collect();
    format!("[{}]", items.join(", "))
}

fn push_optional_path(output: &mut String, key: &str, path: Option<&Path>) {
    match path {
        Some(path) => output.push_str(&format!(
            "{} = {}\n",
            key,
            quoted(&path.to_string_lossy())
        )),
        None => output.push_str(&format!("# {} = \"\"\n", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TonalConfig::default();
        assert_eq!(config.spelling.prefer, "auto");
        assert_eq!(config.analysis.interval_labels, "numeric");
        assert!(config.functions.major_features.contains(&"sixth_chords".to_string()));
        assert!(config.catalog.scales_path.is_none());
    }

    #[test]
    fn test_to_toml_sections() {
        let toml = TonalConfig::default().to_toml();
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[spelling]"));
        assert!(toml.contains("[functions]"));
        assert!(toml.contains("\"parallel_major\""));
    }

    #[test]
    fn test_to_toml_round_trip() {
        let mut config = TonalConfig::default();
        config.catalog.scales_path = Some(PathBuf::from("/data/scales.json"));
        config.spelling.prefer = "flats".to_string();
        config.spelling.key_signature = Some(-4);
        config.analysis.include_voicings = false;
        config.functions.minor_features = vec!["diatonic".to_string(), "raised_sixth".to_string()];

        let reloaded = loader::parse_toml(&config.to_toml(), Path::new("round.toml")).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ninterval_labels = \"classical\"").unwrap();

        let (config, sources) = TonalConfig::load_with_sources_from(Some(file.path())).unwrap();
        assert_eq!(config.analysis.interval_labels, "classical");
        assert_eq!(sources.files.last().map(PathBuf::as_path), Some(file.path()));
    }
}
