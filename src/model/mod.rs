pub mod block;
pub mod fixture;

/// Normalise an upstream id (JSON number or string) to the string form used as a mapping key/value.
pub fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
