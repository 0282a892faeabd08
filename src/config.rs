use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::shader::{ShaderOptions, ShaderVariant};
use crate::view::ViewState;

/// Page configuration. Every field has a default, so an empty object or no
/// config element at all is valid.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub variant: ShaderVariant,
    pub debounce_ms: f64,
    pub miss_cutoff: Option<f32>,
    pub light_marker: bool,
    #[serde(deserialize_with = "de_level")]
    pub log_level: LevelFilter,
    pub initial: ViewState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: ShaderVariant::default(),
            debounce_ms: 100.0,
            miss_cutoff: None,
            light_marker: true,
            log_level: LevelFilter::Info,
            initial: ViewState::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(text)?;
        config.debounce_ms = sanitize_debounce(config.debounce_ms);
        Ok(config)
    }

    /// Apply `key=value` pairs from a URL query string (leading `?` optional).
    ///
    /// Unknown keys are skipped; a bad value for a known key is an error.
    pub fn apply_query(&mut self, query: &str) -> Result<(), ConfigError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "variant" => self.variant = value.parse()?,
                "debounceMs" => self.debounce_ms = sanitize_debounce(parse(key, value)?),
                "missCutoff" => {
                    self.miss_cutoff = if value.is_empty() || value == "none" {
                        None
                    } else {
                        Some(parse(key, value)?)
                    }
                }
                "lightMarker" => self.light_marker = parse(key, value)?,
                "logLevel" => self.log_level = parse(key, value)?,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn shader_options(&self) -> ShaderOptions {
        ShaderOptions {
            miss_cutoff: self.miss_cutoff,
            light_marker: self.light_marker,
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn sanitize_debounce(ms: f64) -> f64 {
    if ms.is_finite() {
        ms.max(0.0)
    } else {
        100.0
    }
}

fn de_level<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}
