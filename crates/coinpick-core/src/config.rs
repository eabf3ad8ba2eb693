#![forbid(unsafe_code)]

//! Host-supplied configuration.
//!
//! The embedding page passes a JSON object; every key is optional:
//!
//! ```json
//! {
//!   "windowMultiplier": 2,
//!   "rowHeightHint": 0,
//!   "coinListUrl": "https://api-eu.okotoki.com/coins",
//!   "log": { "filter": "info", "format": "pretty" }
//! }
//! ```
//!
//! [`PickerConfig::from_json`] decodes and validates in one step and reports
//! every violation as a [`ConfigError`].

use std::fmt;

use serde::Deserialize;

/// Default upstream endpoint serving the coin-name array.
pub const DEFAULT_COIN_LIST_URL: &str = "https://api-eu.okotoki.com/coins";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    #[serde(alias = "text")]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `coinpick_widgets=trace`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Picker configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Window size = `ceil(viewport_height / row_height) * window_multiplier`.
    pub window_multiplier: usize,
    /// Row height used until the host supplies a measurement. `0.0` means
    /// "unmeasured" and keeps the window empty.
    pub row_height_hint: f64,
    /// Endpoint the host fetches the coin list from.
    pub coin_list_url: String,
    pub log: LogConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            window_multiplier: 2,
            row_height_hint: 0.0,
            coin_list_url: DEFAULT_COIN_LIST_URL.to_string(),
            log: LogConfig::default(),
        }
    }
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl PickerConfig {
    /// Decode a JSON config object and validate it.
    ///
    /// A blank body yields the defaults. A malformed body is reported as a
    /// single `config` error; otherwise every failed constraint is returned.
    pub fn from_json(body: &str) -> Result<PickerConfig, Vec<ConfigError>> {
        if body.trim().is_empty() {
            return Ok(PickerConfig::default());
        }
        let config: PickerConfig = serde_json::from_str(body)
            .map_err(|e| vec![ConfigError::new("config", "<json>", e.to_string())])?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.window_multiplier == 0 {
            errors.push(ConfigError::new(
                "window_multiplier",
                "0",
                "must be at least 1",
            ));
        }
        if !self.row_height_hint.is_finite() || self.row_height_hint < 0.0 {
            errors.push(ConfigError::new(
                "row_height_hint",
                self.row_height_hint.to_string(),
                "must be a finite, non-negative number",
            ));
        }
        if self.coin_list_url.trim().is_empty() {
            errors.push(ConfigError::new("coin_list_url", "", "must not be empty"));
        }
        if self.log.filter.trim().is_empty() {
            errors.push(ConfigError::new("log.filter", "", "must not be empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short human-readable summary for startup logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        format!(
            "window x{} · row {} · log {}/{}",
            self.window_multiplier, self.row_height_hint, self.log.filter, self.log.format
        )
    }
}
