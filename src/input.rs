//! Input normalization.
//!
//! Form fields arrive as free text. Everything here turns that text into a
//! finite, non-negative number; nothing in this module fails.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const CURRENCY_PREFIXES: [&str; 4] = ["₹", "INR", "Rs.", "Rs"];

/// Parses an amount or rate typed by a user.
///
/// Accepts `₹`/`Rs`/`INR` prefixes and `,`/`_` group separators
/// (`"₹ 50,00,000"` reads as `5000000`). Empty, unparsable, negative and
/// non-finite input all read as `0`.
pub fn parse_amount(raw: &str) -> f64 {
    let mut text = raw.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim_start();
            break;
        }
    }

    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) => sanitize(value),
        Err(_) => {
            warn!("Unparsable numeric input '{}', treating as 0", raw);
            0.0
        }
    }
}

/// Parses a whole count (months, years of a recurring plan). Fractions are
/// floored and the result saturates at `u32::MAX`.
pub fn parse_count(raw: &str) -> u32 {
    to_count(parse_amount(raw))
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on"
    )
}

/// Clamps a typed value into the calculators' domain: NaN, infinities and
/// negatives become `0`.
pub fn sanitize(value: f64) -> f64 {
    if !value.is_finite() {
        warn!("Non-finite input {} clamped to 0", value);
        return 0.0;
    }
    if value < 0.0 {
        warn!("Negative input {} clamped to 0", value);
        return 0.0;
    }
    value
}

pub fn to_count(value: f64) -> u32 {
    let value = sanitize(value).floor();
    if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// Raw form fields as the presentation layer submits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    fields: BTreeMap<String, String>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .is_some_and(|value| !value.trim().is_empty())
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).map(parse_flag).unwrap_or(false)
    }

    pub fn normalize(&self) -> CalculatorInput {
        CalculatorInput::from(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Normalized parameters: every value is finite and `>= 0`, and absent
/// parameters read as `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    values: BTreeMap<String, f64>,
}

impl CalculatorInput {
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn count(&self, name: &str) -> u32 {
        to_count(self.get(name))
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), sanitize(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&RawInput> for CalculatorInput {
    fn from(raw: &RawInput) -> Self {
        Self {
            values: raw
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), parse_amount(value)))
                .collect(),
        }
    }
}
