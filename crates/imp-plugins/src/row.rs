//! Mapped rows passed through plugin hooks.

use serde_json::{Map, Value};

/// One mapped record keyed by target field key.
pub type Row = Map<String, Value>;

/// Builds a row of string values.
pub fn row_from_pairs<K, V, I>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect()
}

/// Text value of a field; numbers and booleans are rendered, anything else
/// (missing, null, arrays, objects) yields `None`.
pub fn row_text(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Splits a comma-separated cell into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Converts a field to a JSON array: arrays stay, a string is split on
/// commas, anything else becomes an empty list.
pub(crate) fn to_list(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(Value::String(s)) => Value::Array(split_list(s).into_iter().map(Value::String).collect()),
        _ => Value::Array(Vec::new()),
    }
}

/// `true` only for `true`, `"true"` and `"1"`.
pub(crate) fn to_flag(value: Option<&Value>) -> Value {
    let flag = match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true" || s == "1",
        _ => false,
    };
    Value::Bool(flag)
}
