//! Canonicalization of configuration documents.
//!
//! AWS Config hands back configurations whose key order is arbitrary and
//! whose interesting fields are often JSON documents stored as strings,
//! sometimes URL-encoded on top (IAM policy documents are the usual
//! example). [`normalize`] unwraps those strings and sorts every object so
//! two semantically equal configurations serialize to the same text.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// URL-encoded form of `{`.
const ENCODED_OBJECT_PREFIX: &str = "%7B";

/// Options controlling normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Sort array elements when they are mutually orderable.
    ///
    /// Off by default: AWS reorders some lists between snapshots, but for
    /// others (rule lists, route tables) the order is meaningful.
    pub sort_sequences: bool,
}

impl NormalizeOptions {
    /// Options with sequence sorting enabled.
    #[must_use]
    pub const fn sorted() -> Self {
        Self {
            sort_sequences: true,
        }
    }
}

/// A JSON value in canonical form.
///
/// Only [`normalize`] produces one, so holding a `NormalizedValue` means
/// every object in it has sorted keys and every embedded JSON string has
/// been expanded.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedValue(Value);

impl NormalizedValue {
    /// Borrow the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume and return the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Pretty-printed JSON with two-space indentation.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        pretty_json(&self.0)
    }

    /// Whether the value carries no information (null or an empty container).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty_string())
    }
}

/// Serialize any JSON value the way snapshots are rendered for diffing.
pub(crate) fn pretty_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are always strings.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Normalize a JSON value into its canonical form.
#[must_use]
pub fn normalize(value: &Value, options: &NormalizeOptions) -> NormalizedValue {
    NormalizedValue(normalize_value(value, options))
}

/// Normalize a JSON value, returning plain JSON.
#[must_use]
pub fn normalize_value(value: &Value, options: &NormalizeOptions) -> Value {
    match value {
        Value::Array(items) => {
            let normalized: Vec<Value> = items
                .iter()
                .map(|item| normalize_value(item, options))
                .collect();
            if options.sort_sequences {
                Value::Array(sort_if_orderable(normalized))
            } else {
                Value::Array(normalized)
            }
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            // Inserting in sorted order keeps keys sorted whether or not
            // serde_json was built with `preserve_order`.
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key.clone(), normalize_value(value, options)))
                .collect();
            Value::Object(sorted)
        }
        Value::String(s) => normalize_string(s, options),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Expand a string holding (possibly URL-encoded) JSON.
fn normalize_string(s: &str, options: &NormalizeOptions) -> Value {
    let decoded = if s.starts_with(ENCODED_OBJECT_PREFIX) {
        percent_decode_str(s).decode_utf8_lossy()
    } else {
        std::borrow::Cow::Borrowed(s)
    };

    match serde_json::from_str::<Value>(&decoded) {
        Ok(Value::Number(n)) if !is_exact(&n, &decoded) => Value::String(s.to_string()),
        Ok(parsed) => normalize_value(&parsed, options),
        Err(_) => Value::String(s.to_string()),
    }
}

/// Whether `number` keeps every digit of `text`.
///
/// Integers outside 64 bits and decimals with more significant digits than
/// an `f64` holds would collapse distinct values onto one.
fn is_exact(number: &serde_json::Number, text: &str) -> bool {
    if !number.is_f64() {
        return true;
    }
    let text = text.trim().trim_start_matches('-');
    let mantissa = text.split(['e', 'E']).next().unwrap_or_default();
    let Some((whole, fraction)) = mantissa.split_once('.') else {
        // An integer literal only lands in f64 once it overflows 64 bits.
        return false;
    };
    let digits = format!("{whole}{}", fraction.trim_end_matches('0'));
    digits.trim_start_matches('0').len() <= f64::DIGITS as usize
}

/// Sort normalized elements, or return them untouched if any pair cannot
/// be ordered.
fn sort_if_orderable(mut items: Vec<Value>) -> Vec<Value> {
    if items.len() < 2 {
        return items;
    }

    // Checking every pair up front keeps the comparator total for sort_by.
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if compare_values(a, b).is_none() {
                return items;
            }
        }
    }

    items.sort_by(|a, b| compare_values(a, b).unwrap_or(Ordering::Equal));
    items
}

/// Partial ordering over JSON values.
///
/// Numbers and booleans compare numerically with each other, strings
/// lexicographically, arrays element by element. Null and objects have no
/// ordering.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y) {
                match compare_values(left, right)? {
                    Ordering::Equal => continue,
                    unequal => return Some(unequal),
                }
            }
            Some(x.len().cmp(&y.len()))
        }
        _ => {
            let x = numeric(a)?;
            let y = numeric(b)?;
            x.partial_cmp(&y)
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
