use core::fmt;
use std::{fs, path::Path};

use serde::Deserialize;

use crate::input::MAX_POINTERS;

pub const DEFAULT_EVENT: &str = "tap";

/// Tap recognizer options. Every field can be overridden independently; the
/// TOML form lives under a `[tap]` table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TapConfig {
    /// Name of the emitted event.
    pub event: String,
    pub enable: bool,
    /// Required simultaneous contact count.
    pub pointers: usize,
    /// Tap count needed to recognize.
    pub taps: u32,
    /// Max ms between consecutive taps.
    pub interval: u64,
    /// Max ms a single contact may stay down.
    pub time: u64,
    /// Max movement in px during one contact.
    pub threshold: f32,
    /// Max centroid drift in px between taps.
    pub pos_threshold: f32,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            event: DEFAULT_EVENT.into(),
            enable: true,
            pointers: 1,
            taps: 1,
            interval: 300,
            time: 250,
            threshold: 2.0,
            pos_threshold: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    tap: TapConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl TapConfig {
    /// Shorthand for a multi-tap recognizer with otherwise default options.
    pub fn with_taps(event: &str, taps: u32) -> Self {
        Self {
            event: event.into(),
            taps,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.tap.validate()?;
        Ok(file.tap)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event.trim().is_empty() {
            return Err(ConfigError::Validation("tap.event must not be empty".into()));
        }
        if self.pointers == 0 {
            return Err(ConfigError::Validation("tap.pointers must be > 0".into()));
        }
        if self.pointers > MAX_POINTERS {
            return Err(ConfigError::Validation(format!(
                "tap.pointers must be <= {MAX_POINTERS}"
            )));
        }
        if self.taps == 0 {
            return Err(ConfigError::Validation("tap.taps must be > 0".into()));
        }
        if self.interval == 0 {
            return Err(ConfigError::Validation("tap.interval must be > 0".into()));
        }
        if self.time == 0 {
            return Err(ConfigError::Validation("tap.time must be > 0".into()));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::Validation(
                "tap.threshold must be a positive finite number".into(),
            ));
        }
        if !(self.pos_threshold.is_finite() && self.pos_threshold > 0.0) {
            return Err(ConfigError::Validation(
                "tap.pos_threshold must be a positive finite number".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let config = TapConfig::from_toml_str(
            r#"
            [tap]
            event = "doubletap"
            taps = 2
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.event, "doubletap");
        assert_eq!(config.taps, 2);
        assert_eq!(config.interval, 300);
        assert_eq!(config.pos_threshold, 10.0);
        assert!(config.enable);
    }

    #[test]
    fn semantic_validation_rejects_invalid_values() {
        let cases = [
            ("[tap]\ntaps = 0", "tap.taps must be > 0"),
            ("[tap]\npointers = 0", "tap.pointers must be > 0"),
            ("[tap]\npointers = 11", "tap.pointers must be <= 10"),
            ("[tap]\ninterval = 0", "tap.interval must be > 0"),
            ("[tap]\ntime = 0", "tap.time must be > 0"),
            ("[tap]\nthreshold = -1.0", "tap.threshold must be"),
            ("[tap]\npos_threshold = 0.0", "tap.pos_threshold must be"),
            ("[tap]\nevent = \"  \"", "tap.event must not be empty"),
        ];

        for (text, expected_msg) in cases {
            match TapConfig::from_toml_str(text) {
                Err(ConfigError::Validation(msg)) => assert!(
                    msg.contains(expected_msg),
                    "expected validation message containing `{expected_msg}`, got `{msg}`"
                ),
                other => panic!("expected validation error for `{text}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_errors_are_reported_for_schema_mismatches() {
        let err = TapConfig::from_toml_str("[tap]\ntapz = 2").expect_err("unknown key");
        match err {
            ConfigError::Parse(msg) => assert!(msg.contains("tapz"), "got `{msg}`"),
            other => panic!("expected parse error, got {other}"),
        }

        let err = TapConfig::from_toml_str("").expect_err("missing table");
        match err {
            ConfigError::Parse(msg) => assert!(msg.contains("tap"), "got `{msg}`"),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TapConfig::from_path(Path::new("/nonexistent/tap.toml")).expect_err("no file");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
