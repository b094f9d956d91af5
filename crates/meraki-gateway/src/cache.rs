//! TTL cache for redacted read-only responses.
//!
//! The cache sits strictly after the policy engine and the redactor: every
//! request is authorized before the cache is consulted, and only
//! post-redaction values are stored, so a cache hit can never leak a value
//! redaction would have masked. Mutating calls are never cached.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use meraki_types::Settings;

/// In-process TTL cache keyed on `(section, method, arguments)`.
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    inserted_at: Instant,
    value: Value,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Build from settings; `None` when caching is disabled or the TTL is
    /// zero.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        if settings.disable_response_cache || settings.cache_ttl_seconds == 0 {
            return None;
        }
        Some(Self::new(Duration::from_secs(settings.cache_ttl_seconds)))
    }

    /// Fetch a live entry; expired entries are evicted on the way.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, value: Value) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministic cache key: SHA-256 over section, method, and the arguments
/// in sorted-key order (argument maps with identical content hash equally
/// regardless of insertion order).
pub fn cache_key(section: &str, method: &str, args: &Map<String, Value>) -> String {
    let mut sorted: Vec<(&String, &Value)> = args.iter().collect();
    sorted.sort_by_key(|(k, _)| k.as_str());

    let mut hasher = Sha256::new();
    hasher.update(section.as_bytes());
    hasher.update([0]);
    hasher.update(method.as_bytes());
    for (k, v) in sorted {
        hasher.update([0]);
        hasher.update(k.as_bytes());
        hasher.update([0]);
        hasher.update(v.to_string().as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn hit_within_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("k".into(), json!({"a": 1}));
        assert_eq!(cache.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.put("k".into(), json!(1));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn from_settings_respects_disable_flag() {
        let disabled = Settings {
            disable_response_cache: true,
            ..Settings::default()
        };
        assert!(ResponseCache::from_settings(&disabled).is_none());

        let zero_ttl = Settings {
            cache_ttl_seconds: 0,
            ..Settings::default()
        };
        assert!(ResponseCache::from_settings(&zero_ttl).is_none());

        assert!(ResponseCache::from_settings(&Settings::default()).is_some());
    }

    #[test]
    fn key_is_insertion_order_independent() {
        let a = args(&[("serial", json!("Q2XX")), ("perPage", json!(10))]);
        let b = args(&[("perPage", json!(10)), ("serial", json!("Q2XX"))]);
        assert_eq!(cache_key("devices", "getDevice", &a), cache_key("devices", "getDevice", &b));
    }

    #[test]
    fn key_distinguishes_method_and_args() {
        let a = args(&[("serial", json!("Q2XX"))]);
        let b = args(&[("serial", json!("Q2YY"))]);
        assert_ne!(cache_key("devices", "getDevice", &a), cache_key("devices", "getDevice", &b));
        assert_ne!(
            cache_key("devices", "getDevice", &a),
            cache_key("devices", "getDeviceClients", &a)
        );
    }
}
