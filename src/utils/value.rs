use serde_json::Value;

/// Render a JSON claim value for terminal output: strings unquoted, `null`
/// empty, anything else as compact JSON. Control characters are dropped.
pub fn value_to_string(value: Value) -> String {
    let raw = match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };
    raw.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_string_variants() {
        assert_eq!(value_to_string(json!("a\u{7}b")), "ab");
        assert_eq!(value_to_string(json!(null)), "");
        assert_eq!(value_to_string(json!(42)), "42");
        assert_eq!(value_to_string(json!({"flag": true})), "{\"flag\":true}");
    }
}
