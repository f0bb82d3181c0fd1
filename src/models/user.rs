use serde_json::Value;

use crate::utils::value::value_to_string;

/// A printable name for the user claim of a token.
///
/// Object claims are looked up by `name`, then `username`, then `email`;
/// anything else is rendered as-is.
pub fn display_name(user: &Value) -> String {
    match user {
        Value::Object(map) => ["name", "username", "email"]
            .iter()
            .find_map(|key| map.get(*key))
            .cloned()
            .map(value_to_string)
            .unwrap_or_else(|| value_to_string(user.clone())),
        other => value_to_string(other.clone()),
    }
}
