//! Read/mutate classification for dashboard methods.
//!
//! The Meraki SDK exposes hundreds of methods with no machine-readable
//! side-effect flag, so classification is a naming heuristic: a method whose
//! name begins with one of [`MUTATING_PREFIXES`] mutates remote state; all
//! others are read-only. The list is checked in order, case-sensitively,
//! against the method name only -- never the section name.
//!
//! The heuristic has known failure modes (a read-only method could start
//! with a listed verb, a mutating one could not), so operators can layer
//! [`ClassificationOverrides`] to pin specific methods either way.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered verb prefixes that mark a method as mutating.
///
/// Checked by prefix match against the method name. Keep this list in sync
/// with the catalog consistency test in `meraki-dashboard`, which reconciles
/// it against the HTTP verb of every registered endpoint.
pub const MUTATING_PREFIXES: &[&str] = &[
    "create", "update", "delete", "enable", "disable", "generate", "revoke", "claim", "remove",
    "bind", "unbind", "split", "combine", "cycle", "reboot", "blink", "assign",
];

/// Classify a method name with the default prefix heuristic.
pub fn is_mutating_method(method: &str) -> bool {
    MUTATING_PREFIXES.iter().any(|p| method.starts_with(p))
}

/// Operator-configured overrides that re-classify specific methods.
///
/// Keyed by bare method name. Methods without an override fall back to
/// [`is_mutating_method`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationOverrides {
    overrides: HashMap<String, bool>,
}

impl ClassificationOverrides {
    /// Empty override set (every method uses the prefix heuristic).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a method as mutating (`true`) or read-only (`false`).
    pub fn with_override(mut self, method: &str, mutating: bool) -> Self {
        self.overrides.insert(method.to_owned(), mutating);
        self
    }

    /// Classify a method, checking overrides before the prefix heuristic.
    pub fn classify(&self, method: &str) -> bool {
        match self.overrides.get(method) {
            Some(&mutating) => mutating,
            None => is_mutating_method(method),
        }
    }
}
