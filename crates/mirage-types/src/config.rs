//! Terminal configuration.
//!
//! The configuration is a flat map of option name to value, persisted as a
//! JSON object under [`STORAGE_KEY`]. Each option has a semantic kind
//! (color, length, number, text) derived from its default value; a new
//! value is only accepted when it parses as the same kind.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MirageError, Result};

/// Storage key the configuration snapshot lives under.
pub const STORAGE_KEY: &str = "terminal-config";

pub const MAX_HISTORY: &str = "max_history";
pub const MAX_BUFFER: &str = "max_buffer";
pub const TAB_SIZE: &str = "tab_size";
pub const PROMPT_USER: &str = "prompt_user";
pub const PROMPT_SYMBOL: &str = "prompt_symbol";

const DEFAULT_MAX_HISTORY: usize = 10;
const DEFAULT_MAX_BUFFER: usize = 50;
const DEFAULT_TAB_SIZE: usize = 2;

/// Largest value accepted for a numeric option.
pub const MAX_NUMBER: i64 = 10_000;

/// CSS length units accepted for length-valued options.
const LENGTH_UNITS: [&str; 9] = ["%", "cm", "em", "ex", "in", "mm", "pc", "pt", "px"];

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(i64),
    Text(String),
}

impl ConfigValue {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Semantic kind of an option, used to validate new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Color,
    Length,
    Number,
    Text,
}

impl ValueKind {
    /// Classify an existing value.
    pub fn of(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Number(_) => Self::Number,
            ConfigValue::Text(s) if is_color(s) => Self::Color,
            ConfigValue::Text(s) if is_length(s) => Self::Length,
            ConfigValue::Text(_) => Self::Text,
        }
    }

    /// Parse raw user input as a value of this kind.
    pub fn parse(self, raw: &str) -> Option<ConfigValue> {
        let raw = raw.trim();
        match self {
            Self::Color => is_color(raw).then(|| ConfigValue::text(raw)),
            Self::Length => is_length(raw).then(|| ConfigValue::text(raw)),
            Self::Number => raw
                .parse::<i64>()
                .ok()
                .filter(|n| (1..=MAX_NUMBER).contains(n))
                .map(ConfigValue::Number),
            Self::Text => raw
                .parse::<i64>()
                .is_err()
                .then(|| ConfigValue::text(raw)),
        }
    }
}

/// The terminal configuration map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
}

impl Default for Config {
    fn default() -> Self {
        let values = default_entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self { values }
    }
}

fn default_entries() -> Vec<(&'static str, ConfigValue)> {
    vec![
        ("background", ConfigValue::text("#121212")),
        ("foreground", ConfigValue::text("#FFFFFF")),
        ("font_size", ConfigValue::text("17px")),
        ("margin_sides", ConfigValue::text("16px")),
        ("prompt_color", ConfigValue::text("#4be14b")),
        (PROMPT_SYMBOL, ConfigValue::text("$")),
        (PROMPT_USER, ConfigValue::text("Guest")),
        (MAX_BUFFER, ConfigValue::Number(DEFAULT_MAX_BUFFER as i64)),
        (MAX_HISTORY, ConfigValue::Number(DEFAULT_MAX_HISTORY as i64)),
        (TAB_SIZE, ConfigValue::Number(DEFAULT_TAB_SIZE as i64)),
    ]
}

impl Config {
    /// The factory default for a single option.
    pub fn default_value(key: &str) -> Option<ConfigValue> {
        default_entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Build a configuration from a stored JSON snapshot.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        Ok(config)
    }

    /// The JSON snapshot written to storage.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }

    /// Layer a TOML table of overrides on top of the defaults.
    ///
    /// Only strings and integers are accepted as values.
    pub fn from_toml(input: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(input)?;
        let mut config = Self::default();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => ConfigValue::Text(s),
                toml::Value::Integer(n) => ConfigValue::Number(n),
                other => {
                    return Err(MirageError::Config(format!(
                        "unsupported value for '{key}': {other}"
                    )));
                },
            };
            config.values.insert(key, value);
        }
        Ok(config)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Option names in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a value without validation, returning the previous one.
    pub fn insert(&mut self, key: &str, value: ConfigValue) -> Option<ConfigValue> {
        self.values.insert(key.to_string(), value)
    }

    /// Validate raw user input for `key` against the kind of its factory
    /// default. Options without a factory default use their current value.
    ///
    /// Returns `None` when the key is unknown or the value has the wrong shape.
    pub fn parse_value(&self, key: &str, raw: &str) -> Option<ConfigValue> {
        let current = self.values.get(key)?;
        let reference = Self::default_value(key).unwrap_or_else(|| current.clone());
        ValueKind::of(&reference).parse(raw)
    }

    pub fn max_history(&self) -> usize {
        self.positive(MAX_HISTORY).unwrap_or(DEFAULT_MAX_HISTORY)
    }

    pub fn max_buffer(&self) -> usize {
        self.positive(MAX_BUFFER).unwrap_or(DEFAULT_MAX_BUFFER)
    }

    pub fn tab_size(&self) -> usize {
        self.positive(TAB_SIZE).unwrap_or(DEFAULT_TAB_SIZE)
    }

    pub fn prompt_user(&self) -> String {
        self.text_or(PROMPT_USER, "Guest")
    }

    pub fn prompt_symbol(&self) -> String {
        self.text_or(PROMPT_SYMBOL, "$")
    }

    fn positive(&self, key: &str) -> Option<usize> {
        let n = self.values.get(key)?.as_number()?;
        if !(1..=MAX_NUMBER).contains(&n) {
            return None;
        }
        usize::try_from(n).ok()
    }

    fn text_or(&self, key: &str, fallback: &str) -> String {
        self.values
            .get(key)
            .map(ToString::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(..)` or `rgba(..)`.
pub fn is_color(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = s.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));
    let Some(inner) = inner else {
        return false;
    };
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if !matches!(parts.len(), 3 | 4) {
        return false;
    }
    let channels_ok = parts[..3]
        .iter()
        .all(|p| p.parse::<f32>().is_ok_and(|v| (0.0..=255.0).contains(&v)));
    let alpha_ok = parts
        .get(3)
        .is_none_or(|p| p.parse::<f32>().is_ok_and(|v| (0.0..=1.0).contains(&v)));
    channels_ok && alpha_ok
}

/// A non-negative number followed by a CSS length unit, e.g. `24px`, `1.5em`.
pub fn is_length(s: &str) -> bool {
    LENGTH_UNITS.iter().any(|unit| {
        s.strip_suffix(unit).is_some_and(|num| {
            !num.is_empty()
                && num
                    .parse::<f32>()
                    .is_ok_and(|v| v.is_finite() && v >= 0.0)
        })
    })
}
