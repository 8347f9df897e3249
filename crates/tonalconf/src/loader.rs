//! Config file discovery, loading, and environment variable overlay.

use crate::sections::{INTERVAL_LABEL_VALUES, KEY_SIGNATURE_RANGE, SPELLING_VALUES};
use crate::{ConfigError, TonalConfig};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with an explicit override path.
///
/// If `override_path` is provided and exists, it replaces the local
/// `./tonality.toml`.
pub fn discover_config_files_with_override(override_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/tonality/config.toml");
    if system.exists() {
        files.push(system);
    }

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("tonality/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = override_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("tonality.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and layer it over `config`.
pub fn load_from_file(config: &mut TonalConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    apply_toml(config, &contents, path)
}

/// Parse a standalone TOML document over the compiled defaults.
pub fn parse_toml(contents: &str, path: &Path) -> Result<TonalConfig, ConfigError> {
    let mut config = TonalConfig::default();
    apply_toml(&mut config, contents, path)?;
    Ok(config)
}

pub(crate) fn check_spelling(value: &str) -> Result<String, String> {
    let lowered = value.trim().to_ascii_lowercase();
    if SPELLING_VALUES.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(format!("expected one of {SPELLING_VALUES:?}, got {value:?}"))
    }
}

pub(crate) fn check_interval_labels(value: &str) -> Result<String, String> {
    let lowered = value.trim().to_ascii_lowercase();
    if INTERVAL_LABEL_VALUES.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(format!("expected one of {INTERVAL_LABEL_VALUES:?}, got {value:?}"))
    }
}

pub(crate) fn check_key_signature(value: i64) -> Result<i8, String> {
    if KEY_SIGNATURE_RANGE.contains(&value) {
        Ok(value as i8)
    } else {
        Err(format!("key signature must be within -7..=7, got {value}"))
    }
}

/// One `[table]` of a config file, with typed getters that report the
/// offending key on a type mismatch. Absent keys read as `None`.
struct Section<'a> {
    name: &'static str,
    table: Option<&'a toml::Table>,
    path: &'a Path,
}

impl<'a> Section<'a> {
    fn new(root: &'a toml::Table, name: &'static str, path: &'a Path) -> Result<Self, ConfigError> {
        let table = match root.get(name) {
            None => None,
            Some(value) => Some(value.as_table().ok_or_else(|| ConfigError::InvalidValue {
                path: path.to_path_buf(),
                key: name.to_string(),
                message: "expected a table".to_string(),
            })?),
        };
        Ok(Self { name, table, path })
    }

    fn invalid(&self, key: &str, message: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            path: self.path.to_path_buf(),
            key: format!("{}.{}", self.name, key),
            message: message.into(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a toml::Value> {
        self.table.and_then(|t| t.get(key))
    }

    fn str(&self, key: &str) -> Result<Option<&'a str>, ConfigError> {
        self.get(key)
            .map(|v| v.as_str().ok_or_else(|| self.invalid(key, "expected a string")))
            .transpose()
    }

    fn bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.get(key)
            .map(|v| v.as_bool().ok_or_else(|| self.invalid(key, "expected a boolean")))
            .transpose()
    }

    fn integer(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        self.get(key)
            .map(|v| v.as_integer().ok_or_else(|| self.invalid(key, "expected an integer")))
            .transpose()
    }

    fn strings(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let array = value
            .as_array()
            .ok_or_else(|| self.invalid(key, "expected an array of strings"))?;
        array
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(key, "expected an array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Layer a TOML document over `config`. Only keys present in the document
/// change; everything else keeps its current value.
fn apply_toml(config: &mut TonalConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let catalog = Section::new(&table, "catalog", path)?;
    if let Some(v) = catalog.str("scales_path")? {
        config.catalog.scales_path = Some(expand_path(v));
    }
    if let Some(v) = catalog.str("chords_path")? {
        config.catalog.chords_path = Some(expand_path(v));
    }

    let spelling = Section::new(&table, "spelling", path)?;
    if let Some(v) = spelling.str("prefer")? {
        config.spelling.prefer = check_spelling(v).map_err(|m| spelling.invalid("prefer", m))?;
    }
    if let Some(v) = spelling.integer("key_signature")? {
        config.spelling.key_signature =
            Some(check_key_signature(v).map_err(|m| spelling.invalid("key_signature", m))?);
    }

    let analysis = Section::new(&table, "analysis", path)?;
    if let Some(v) = analysis.str("interval_labels")? {
        config.analysis.interval_labels =
            check_interval_labels(v).map_err(|m| analysis.invalid("interval_labels", m))?;
    }
    if let Some(v) = analysis.bool("include_inversions")? {
        config.analysis.include_inversions = v;
    }
    if let Some(v) = analysis.bool("include_voicings")? {
        config.analysis.include_voicings = v;
    }
    if let Some(v) = analysis.bool("include_enharmonics")? {
        config.analysis.include_enharmonics = v;
    }

    let functions = Section::new(&table, "functions", path)?;
    if let Some(v) = functions.strings("major_features")? {
        config.functions.major_features = v;
    }
    if let Some(v) = functions.strings("minor_features")? {
        config.functions.minor_features = v;
    }
    if let Some(v) = functions.bool("include_nondiatonic")? {
        config.functions.include_nondiatonic = v;
    }

    let telemetry = Section::new(&table, "telemetry", path)?;
    if let Some(v) = telemetry.str("log_level")? {
        config.telemetry.log_level = v.to_string();
    }

    Ok(())
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut TonalConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, env::vars());
}

/// Apply `TONALITY_*` overrides from an explicit variable list.
///
/// Invalid values are logged and skipped, leaving the file value in place.
pub fn apply_overrides_from<I>(config: &mut TonalConfig, sources: &mut ConfigSources, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut rust_log = None;
    for (key, value) in vars {
        let applied = match key.as_str() {
            "TONALITY_SCALES_PATH" => {
                config.catalog.scales_path = Some(expand_path(&value));
                true
            }
            "TONALITY_CHORDS_PATH" => {
                config.catalog.chords_path = Some(expand_path(&value));
                true
            }
            "TONALITY_SPELLING" => match check_spelling(&value) {
                Ok(v) => {
                    config.spelling.prefer = v;
                    true
                }
                Err(message) => {
                    warn!(var = %key, %message, "ignoring invalid environment override");
                    false
                }
            },
            "TONALITY_KEY_SIGNATURE" => {
                let parsed = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| e.to_string())
                    .and_then(check_key_signature);
                match parsed {
                    Ok(v) => {
                        config.spelling.key_signature = Some(v);
                        true
                    }
                    Err(message) => {
                        warn!(var = %key, %message, "ignoring invalid environment override");
                        false
                    }
                }
            }
            "TONALITY_INTERVAL_LABELS" => match check_interval_labels(&value) {
                Ok(v) => {
                    config.analysis.interval_labels = v;
                    true
                }
                Err(message) => {
                    warn!(var = %key, %message, "ignoring invalid environment override");
                    false
                }
            },
            "TONALITY_LOG_LEVEL" => {
                config.telemetry.log_level = value;
                true
            }
            "RUST_LOG" => {
                rust_log = Some(value);
                false
            }
            _ => false,
        };
        if applied {
            sources.env_overrides.push(key);
        }
    }

    // RUST_LOG wins over TONALITY_LOG_LEVEL regardless of iteration order
    if let Some(value) = rust_log {
        config.telemetry.log_level = value;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
