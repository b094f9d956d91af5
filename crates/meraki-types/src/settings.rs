//! Environment-sourced gateway configuration.
//!
//! [`Settings`] is constructed once at process start and passed by `Arc`
//! into every component; nothing reads the environment after startup. Tests
//! build instances directly or through [`Settings::from_lookup`] with a map,
//! so they never touch the real process environment.

use std::collections::HashSet;

/// Default sensitive key names redacted from responses.
pub const DEFAULT_REDACT_KEYS: &[&str] = &["psk", "password", "secret", "token", "apiKey", "key"];

/// Gateway configuration, read-only after load.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Meraki Dashboard API key. Empty disables tool registration.
    pub api_key: String,
    /// Whether mutating methods may execute at all.
    pub allow_mutations: bool,
    /// Whether mutating methods additionally require `confirm=true`.
    pub require_confirm_for_mutations: bool,
    /// Allow-list of section names. Non-empty switches reads to default-deny.
    pub allow_sections: Vec<String>,
    /// Allow-list of method names, each `method` or `section.method`.
    pub allow_methods: Vec<String>,
    /// Deny-list of section names. Always wins.
    pub deny_sections: Vec<String>,
    /// Deny-list of method names, each `method` or `section.method`.
    pub deny_methods: Vec<String>,
    /// Upper bound applied to `perPage` arguments.
    pub max_per_page: u64,
    /// Upper bound (seconds) applied to `timespan` arguments.
    pub max_timespan: u64,
    /// Key names whose values are redacted from responses (exact,
    /// case-insensitive match).
    pub redact_keys: Vec<String>,
    /// TTL for the read-only response cache.
    pub cache_ttl_seconds: u64,
    /// Disables the response cache entirely.
    pub disable_response_cache: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            allow_mutations: false,
            require_confirm_for_mutations: true,
            allow_sections: Vec::new(),
            allow_methods: Vec::new(),
            deny_sections: Vec::new(),
            deny_methods: Vec::new(),
            max_per_page: 500,
            max_timespan: 86_400,
            redact_keys: DEFAULT_REDACT_KEYS.iter().map(|s| s.to_string()).collect(),
            cache_ttl_seconds: 60,
            disable_response_cache: false,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        Self {
            api_key: lookup("MERAKI_API_KEY").unwrap_or(defaults.api_key),
            allow_mutations: parse_bool(lookup("ALLOW_MUTATIONS")).unwrap_or(defaults.allow_mutations),
            require_confirm_for_mutations: parse_bool(lookup("REQUIRE_CONFIRM_FOR_MUTATIONS"))
                .unwrap_or(defaults.require_confirm_for_mutations),
            allow_sections: parse_list(lookup("ALLOW_SECTIONS")),
            allow_methods: parse_list(lookup("ALLOW_METHODS")),
            deny_sections: parse_list(lookup("DENY_SECTIONS")),
            deny_methods: parse_list(lookup("DENY_METHODS")),
            max_per_page: parse_int(lookup("MAX_PER_PAGE")).unwrap_or(defaults.max_per_page),
            max_timespan: parse_int(lookup("MAX_TIMESPAN")).unwrap_or(defaults.max_timespan),
            redact_keys: match lookup("REDACT_KEYS") {
                Some(raw) => parse_list(Some(raw)),
                None => defaults.redact_keys,
            },
            cache_ttl_seconds: parse_int(lookup("CACHE_TTL_SECONDS"))
                .unwrap_or(defaults.cache_ttl_seconds),
            disable_response_cache: parse_bool(lookup("DISABLE_RESPONSE_CACHE"))
                .unwrap_or(defaults.disable_response_cache),
        }
    }

    /// Lowercased redact-key set for case-insensitive matching.
    pub fn redact_key_set(&self) -> HashSet<String> {
        self.redact_keys.iter().map(|k| k.to_lowercase()).collect()
    }

    /// Whether either allow-list is configured (switches the policy engine
    /// to default-deny for everything not listed).
    pub fn has_allow_list(&self) -> bool {
        !self.allow_sections.is_empty() || !self.allow_methods.is_empty()
    }
}

fn parse_bool(value: Option<String>) -> Option<bool> {
    let value = value?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_int(value: Option<String>) -> Option<u64> {
    value?.trim().parse().ok()
}

fn parse_list(value: Option<String>) -> Vec<String> {
    match value {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
