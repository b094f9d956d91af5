//! Key-based redaction of sensitive response fields.
//!
//! Walks a JSON value recursively and replaces the value of every mapping
//! entry whose key matches the configured set with [`REDACTED`]. Matching is
//! an exact, case-insensitive key comparison -- not substring or regex -- so
//! `apiKeyLastUsed` survives unless explicitly listed. The input is never
//! mutated; callers get a deep copy.

use std::collections::HashSet;

use serde_json::Value;

use meraki_types::Settings;

/// Sentinel that replaces redacted values.
pub const REDACTED: &str = "***REDACTED***";

/// Redacts configured key names from JSON values.
pub struct Redactor {
    /// Lowercased key names.
    keys: HashSet<String>,
}

impl Redactor {
    /// Build from an explicit key set (keys are lowercased internally).
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            keys: settings.redact_key_set(),
        }
    }

    /// Deep-copy `value` with sensitive entries replaced by [`REDACTED`].
    pub fn redact(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, inner)| {
                        if self.keys.contains(&key.to_lowercase()) {
                            (key.clone(), Value::String(REDACTED.to_string()))
                        } else {
                            (key.clone(), self.redact(inner))
                        }
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.redact(v)).collect()),
            scalar => scalar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_redactor() -> Redactor {
        Redactor::from_settings(&Settings::default())
    }

    #[test]
    fn top_level_key_is_redacted() {
        let r = default_redactor();
        let out = r.redact(&json!({"serial": "Q2XX", "apiKey": "SECRET"}));
        assert_eq!(out, json!({"serial": "Q2XX", "apiKey": REDACTED}));
    }

    #[test]
    fn nested_keys_redacted_at_any_depth() {
        let r = default_redactor();
        let input = json!({
            "name": "Office SSID",
            "auth": {"mode": "psk", "psk": "wpa2-passphrase"},
            "radius": [
                {"host": "10.0.0.5", "secret": "radius-secret"},
                {"host": "10.0.0.6", "secret": "radius-secret-2"}
            ]
        });
        let out = r.redact(&input);
        assert_eq!(out["auth"]["psk"], json!(REDACTED));
        assert_eq!(out["radius"][0]["secret"], json!(REDACTED));
        assert_eq!(out["radius"][1]["secret"], json!(REDACTED));
        // Non-sensitive neighbors survive.
        assert_eq!(out["auth"]["mode"], json!("psk"));
        assert_eq!(out["radius"][0]["host"], json!("10.0.0.5"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let r = default_redactor();
        let out = r.redact(&json!({"ApiKey": "x", "PASSWORD": "y", "Token": "z"}));
        assert_eq!(out, json!({"ApiKey": REDACTED, "PASSWORD": REDACTED, "Token": REDACTED}));
    }

    #[test]
    fn matching_is_exact_not_substring() {
        let r = default_redactor();
        let out = r.redact(&json!({"apiKeyLastUsed": "2024-01-01", "keyring": "k1"}));
        // Neither key equals a configured name, so both survive.
        assert_eq!(out["apiKeyLastUsed"], json!("2024-01-01"));
        assert_eq!(out["keyring"], json!("k1"));
    }

    #[test]
    fn original_value_never_survives_serialization() {
        let r = default_redactor();
        let out = r.redact(&json!({
            "wireless": {"ssids": [{"psk": "hunter2"}]},
            "admin": {"password": "hunter2"}
        }));
        let serialized = serde_json::to_string(&out).unwrap();
        assert!(!serialized.contains("hunter2"));
    }

    #[test]
    fn input_is_not_mutated() {
        let r = default_redactor();
        let input = json!({"apiKey": "SECRET"});
        let _ = r.redact(&input);
        assert_eq!(input["apiKey"], json!("SECRET"));
    }

    #[test]
    fn scalars_and_arrays_of_scalars_untouched() {
        let r = default_redactor();
        assert_eq!(r.redact(&json!(42)), json!(42));
        assert_eq!(r.redact(&json!("password")), json!("password"));
        assert_eq!(r.redact(&json!([1, "two", null])), json!([1, "two", null]));
    }

    #[test]
    fn custom_key_set() {
        let r = Redactor::new(vec!["sharedSecret".to_string()]);
        let out = r.redact(&json!({"sharedsecret": "x", "password": "y"}));
        assert_eq!(out["sharedsecret"], json!(REDACTED));
        // "password" is not in this custom set.
        assert_eq!(out["password"], json!("y"));
    }
}
