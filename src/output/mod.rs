//! Rendering of results for the terminal
//!
//! All lines use the `key="value"` shape so they can be sourced by a shell.

use serde_json::Value as JsonValue;

/// Every scalar leaf of `value` with its dotted path, in document order.
///
/// Object keys and array indexes are joined by `.`; a scalar root yields a
/// single entry with an empty key.
///
/// # Examples
/// ```
/// use mwquery::output::flatten;
/// let doc = serde_json::json!({"user": {"name": "ann", "roles": ["a", "b"]}});
/// let lines = flatten(&doc);
/// assert_eq!(lines[0], ("user.name".to_string(), "ann".to_string()));
/// assert_eq!(lines[2], ("user.roles.1".to_string(), "b".to_string()));
/// ```
pub fn flatten(value: &JsonValue) -> Vec<(String, String)> {
    let mut out = Vec::new();
    walk(value, &mut String::new(), &mut out);
    out
}

fn walk(value: &JsonValue, prefix: &mut String, out: &mut Vec<(String, String)>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                descend(child, key, prefix, out);
            }
        }
        JsonValue::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                descend(child, &index.to_string(), prefix, out);
            }
        }
        scalar => out.push((prefix.clone(), scalar_text(scalar))),
    }
}

fn descend(child: &JsonValue, segment: &str, prefix: &mut String, out: &mut Vec<(String, String)>) {
    let len = prefix.len();
    if !prefix.is_empty() {
        prefix.push('.');
    }
    prefix.push_str(segment);
    walk(child, prefix, out);
    prefix.truncate(len);
}

/// Strings as their raw text, anything else as compact JSON
pub fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One `key="value"` output line
pub fn assignment(key: &str, value: &str) -> String {
    format!("{}=\"{}\"", key, value)
}

/// Flattened body as output lines; a body that is not JSON produces none.
pub fn flatten_body(body: &str) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<JsonValue>(body) {
        Ok(value @ (JsonValue::Object(_) | JsonValue::Array(_))) => flatten(&value)
            .iter()
            .map(|(k, v)| assignment(k, v))
            .collect(),
        _ => Vec::new(),
    }
}
