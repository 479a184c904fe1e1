//! Text helpers

use serde_json::{Map, Value};

/// Mask a secret value, one bullet per character
///
/// # Examples
/// ```
/// use linguaflow::util::format::mask_secret;
///
/// assert_eq!(mask_secret("abc"), "•••");
/// assert_eq!(mask_secret(""), "");
/// ```
pub fn mask_secret(value: &str) -> String {
    "•".repeat(value.chars().count())
}

/// Render a navigation payload as `key: value` lines, keys in order
///
/// Strings are shown without quotes and arrays are joined with commas.
/// Anything else falls back to compact JSON.
pub fn describe_params(params: &Map<String, Value>) -> Vec<String> {
    params
        .iter()
        .map(|(key, value)| format!("{}: {}", key, describe_value(value)))
        .collect()
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(describe_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
