use indexmap::IndexMap;
use serde_json::Value;

/// Options handed verbatim to the [`XmlSanitizer`](super::sanitizer::XmlSanitizer).
pub type SanitizerOptions = IndexMap<String, Value>;

/// Options applied unless the caller overrides them.
pub fn default_sanitizer_options() -> SanitizerOptions {
    SanitizerOptions::from([
        ("input-xml".to_string(), Value::Bool(true)),
        ("output-xml".to_string(), Value::Bool(true)),
        ("clean".to_string(), Value::Bool(true)),
    ])
}

/// Merges `overrides` over `defaults`; on a key collision the override wins
/// and the key keeps its default position.
pub fn merge_options(defaults: &SanitizerOptions, overrides: &SanitizerOptions) -> SanitizerOptions {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Reads an option as a flag: `true`, non-zero numbers and the strings
/// `"1"`, `"true"`, `"yes"`, `"on"` count as set.
pub fn is_enabled(options: &SanitizerOptions, key: &str) -> bool {
    match options.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(
            s.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Tag names driving the flattening of one WXR item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenRules {
    pub item_tag: String,
    pub category_tag: String,
    /// Attribute categories are grouped by
    pub category_group_attribute: String,
    pub postmeta_tag: String,
    pub meta_key_tag: String,
    pub meta_value_tag: String,
}

impl Default for FlattenRules {
    fn default() -> Self {
        Self {
            item_tag: "item".to_string(),
            category_tag: "category".to_string(),
            category_group_attribute: "domain".to_string(),
            postmeta_tag: "wp:postmeta".to_string(),
            meta_key_tag: "wp:meta_key".to_string(),
            meta_value_tag: "wp:meta_value".to_string(),
        }
    }
}
