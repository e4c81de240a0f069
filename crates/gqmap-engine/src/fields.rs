//! Field helpers shared by the catalog and store parsers.

use serde_json::{Map, Value};

/// First non-blank scalar among `keys`, trimmed.
///
/// Numbers are accepted and rendered in their JSON form (phone numbers
/// sometimes arrive unquoted).
pub(crate) fn text_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First present, non-null value among `keys`.
pub(crate) fn first_value<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
}
