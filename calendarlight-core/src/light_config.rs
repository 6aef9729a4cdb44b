//! How a light should look while an event is running.
//!
//! Events carry their light config as YAML in the description:
//!
//! ```yaml
//! color: blue
//! dim: 40
//! ```
//!
//! A missing description means "use the default": a full-brightness red light.

use std::fmt;

use busylight::Rgb;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{CalendarLightError, CalendarLightResult};

pub const DEFAULT_COLOR: &str = "red";
pub const MAX_DIM: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightAction {
    #[default]
    On,
    Off,
}

impl fmt::Display for LightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightAction::On => write!(f, "on"),
            LightAction::Off => write!(f, "off"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLightConfig")]
pub struct LightConfig {
    pub action: LightAction,
    pub color: String,
    pub dim: u8,
}

impl Default for LightConfig {
    fn default() -> Self {
        LightConfig {
            action: LightAction::On,
            color: DEFAULT_COLOR.to_string(),
            dim: MAX_DIM,
        }
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_dim() -> i64 {
    i64::from(MAX_DIM)
}

/// A `color` value as YAML typed it. Unquoted hex like `112233` or
/// `0x112233` arrives as an integer.
#[derive(Debug, Clone, PartialEq, Default)]
enum ColorInput {
    #[default]
    Missing,
    Empty,
    Text(String),
    Integer(u64),
}

fn color_input<'de, D>(deserializer: D) -> Result<ColorInput, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(ColorInput::Empty),
        Value::String(s) => Ok(ColorInput::Text(s)),
        Value::Number(n) => Ok(match n.as_u64() {
            Some(n) => ColorInput::Integer(n),
            None => ColorInput::Text(n.to_string()),
        }),
        Value::Bool(b) => Ok(ColorInput::Text(b.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "color must be a name or hex code, found {}",
            describe(&other)
        ))),
    }
}

impl ColorInput {
    /// The color text to use, or `None` when it is not a known color.
    fn resolve(self) -> Option<String> {
        let candidates = match self {
            ColorInput::Missing => vec![default_color()],
            ColorInput::Empty => vec![],
            ColorInput::Text(s) => vec![s],
            // Written in decimal (`112233`) or in `0x` notation.
            ColorInput::Integer(n) => vec![n.to_string(), format!("{n:06x}")],
        };

        candidates
            .into_iter()
            .find(|c| busylight::parse_color(c).is_ok())
    }

    fn label(&self) -> String {
        match self {
            ColorInput::Missing | ColorInput::Empty => "(empty)".to_string(),
            ColorInput::Text(s) => s.clone(),
            ColorInput::Integer(n) => n.to_string(),
        }
    }
}

/// Unvalidated form, as written by users.
#[derive(Deserialize)]
struct RawLightConfig {
    #[serde(default)]
    action: LightAction,
    #[serde(default, deserialize_with = "color_input")]
    color: ColorInput,
    #[serde(default = "default_dim")]
    dim: i64,
}

impl TryFrom<RawLightConfig> for LightConfig {
    type Error = String;

    fn try_from(raw: RawLightConfig) -> Result<Self, Self::Error> {
        let dim = validate_dim(raw.dim)?;

        // An unknown color is not fatal: fall back to the default.
        let shown = raw.color.label();
        let color = raw.color.resolve().unwrap_or_else(|| {
            tracing::warn!("Invalid color: {}. Defaulting to {}", shown, DEFAULT_COLOR);
            default_color()
        });

        Ok(LightConfig {
            action: raw.action,
            color,
            dim,
        })
    }
}

fn validate_dim(dim: i64) -> Result<u8, String> {
    u8::try_from(dim)
        .ok()
        .filter(|d| *d <= MAX_DIM)
        .ok_or_else(|| format!("dim must be between 0 and {MAX_DIM}, got {dim}"))
}

impl LightConfig {
    /// Build a config from user input. Unlike YAML input, an unknown color is
    /// rejected here.
    pub fn new(action: LightAction, color: &str, dim: i64) -> CalendarLightResult<Self> {
        let dim = validate_dim(dim).map_err(CalendarLightError::InvalidLightConfig)?;
        busylight::parse_color(color)?;

        Ok(LightConfig {
            action,
            color: color.trim().to_string(),
            dim,
        })
    }

    /// The color to show, dimmed.
    pub fn rgb(&self) -> Rgb {
        busylight::parse_color_dimmed(&self.color, self.dim).unwrap_or_else(|_| {
            busylight::parse_color_dimmed(DEFAULT_COLOR, self.dim).unwrap_or(Rgb::new(255, 0, 0))
        })
    }

    /// Parse an event description.
    ///
    /// Returns `Ok(None)` when the description is blank (or YAML null), so
    /// the caller can pick a fallback. Anything that is not a YAML mapping
    /// of light settings is an error.
    pub fn from_description(description: Option<&str>) -> CalendarLightResult<Option<Self>> {
        let Some(text) = description.map(normalize_description) else {
            return Ok(None);
        };

        if text.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_yaml::from_str(&text)
            .map_err(|e| CalendarLightError::InvalidLightConfig(e.to_string()))?;

        match value {
            Value::Null => Ok(None),
            Value::Mapping(_) => serde_yaml::from_value(value)
                .map(Some)
                .map_err(|e| CalendarLightError::InvalidLightConfig(e.to_string())),
            other => Err(CalendarLightError::InvalidLightConfig(format!(
                "expected key/value settings, found {}",
                describe(&other)
            ))),
        }
    }
}

impl fmt::Display for LightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}%", self.action, self.color, self.dim)
    }
}

/// Google Calendar stores descriptions edited in its web UI as HTML, with
/// `<br>` for line breaks.
fn normalize_description(description: &str) -> String {
    description
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("&nbsp;", " ")
        .lines()
        .map(quote_hash_color)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `color: #00ff00` would otherwise be read as an empty value followed by a
/// YAML comment.
fn quote_hash_color(line: &str) -> String {
    if let Some((key, value)) = line.split_once(':') {
        let value = value.trim();
        let is_hex = value
            .strip_prefix('#')
            .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if key.trim() == "color" && is_hex {
            return format!("{key}: \"{value}\"");
        }
    }
    line.to_string()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
