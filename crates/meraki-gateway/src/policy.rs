//! Allow/deny policy for dashboard capabilities.
//!
//! Evaluation order, first match wins:
//!
//! 1. Deny-lists (bare method, `section.method`, or section) -- always win.
//! 2. Allow-lists -- a non-empty allow-list switches the engine from
//!    default-allow to default-deny for anything not listed.
//! 3. Mutation gate -- applied only to mutating methods: mutations must be
//!    enabled, and (when configured) the call must carry `confirm=true`.
//! 4. Allow.
//!
//! Deny-lists therefore override allow-lists and the mutation gate, and the
//! mutation gate never affects read-only calls.

use std::sync::Arc;

use meraki_types::{DenyKind, Settings};

/// Result of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { kind: DenyKind },
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Evaluates calls against the loaded [`Settings`].
pub struct PolicyEngine {
    settings: Arc<Settings>,
}

impl PolicyEngine {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Authorize one invocation.
    ///
    /// `confirm` is the request's explicit confirmation flag; it only
    /// matters for mutating methods when confirmation is required.
    pub fn authorize(
        &self,
        section: &str,
        method: &str,
        is_mutating: bool,
        confirm: bool,
    ) -> Decision {
        let s = &self.settings;
        let qualified = format!("{section}.{method}");

        if list_has(&s.deny_methods, method)
            || list_has(&s.deny_methods, &qualified)
            || list_has(&s.deny_sections, section)
        {
            return Decision::Deny {
                kind: DenyKind::Blocked,
            };
        }

        if s.has_allow_list() {
            let listed = list_has(&s.allow_sections, section)
                || list_has(&s.allow_methods, method)
                || list_has(&s.allow_methods, &qualified);
            if !listed {
                return Decision::Deny {
                    kind: DenyKind::Blocked,
                };
            }
        }

        if is_mutating {
            if !s.allow_mutations {
                return Decision::Deny {
                    kind: DenyKind::MutationsDisabled,
                };
            }
            if s.require_confirm_for_mutations && !confirm {
                return Decision::Deny {
                    kind: DenyKind::ConfirmationRequired,
                };
            }
        }

        Decision::Allow
    }
}

fn list_has(list: &[String], entry: &str) -> bool {
    list.iter().any(|e| e == entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(settings: Settings) -> PolicyEngine {
        PolicyEngine::new(Arc::new(settings))
    }

    #[test]
    fn default_policy_allows_reads() {
        let p = engine(Settings::default());
        assert_eq!(p.authorize("devices", "getDevice", false, false), Decision::Allow);
    }

    #[test]
    fn default_policy_denies_mutations() {
        let p = engine(Settings::default());
        assert_eq!(
            p.authorize("networks", "updateNetwork", true, false),
            Decision::Deny {
                kind: DenyKind::MutationsDisabled
            }
        );
        // Even with confirm -- mutations are off entirely.
        assert_eq!(
            p.authorize("networks", "updateNetwork", true, true),
            Decision::Deny {
                kind: DenyKind::MutationsDisabled
            }
        );
    }

    #[test]
    fn mutation_requires_confirm_when_configured() {
        let p = engine(Settings {
            allow_mutations: true,
            require_confirm_for_mutations: true,
            ..Settings::default()
        });
        assert_eq!(
            p.authorize("networks", "updateNetwork", true, false),
            Decision::Deny {
                kind: DenyKind::ConfirmationRequired
            }
        );
        assert_eq!(p.authorize("networks", "updateNetwork", true, true), Decision::Allow);
    }

    #[test]
    fn mutation_without_confirm_requirement() {
        let p = engine(Settings {
            allow_mutations: true,
            require_confirm_for_mutations: false,
            ..Settings::default()
        });
        assert_eq!(p.authorize("networks", "updateNetwork", true, false), Decision::Allow);
    }

    #[test]
    fn mutation_gate_never_affects_reads() {
        let p = engine(Settings {
            allow_mutations: false,
            require_confirm_for_mutations: true,
            ..Settings::default()
        });
        assert_eq!(p.authorize("devices", "getDevice", false, false), Decision::Allow);
    }

    #[test]
    fn deny_section_blocks_every_method() {
        let p = engine(Settings {
            deny_sections: vec!["devices".into()],
            ..Settings::default()
        });
        assert_eq!(
            p.authorize("devices", "getDevice", false, false),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
        assert_eq!(
            p.authorize("devices", "rebootDevice", true, true),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
        // Other sections are untouched.
        assert_eq!(p.authorize("networks", "getNetwork", false, false), Decision::Allow);
    }

    #[test]
    fn deny_method_bare_and_qualified() {
        let p = engine(Settings {
            deny_methods: vec!["rebootDevice".into(), "networks.deleteNetwork".into()],
            allow_mutations: true,
            require_confirm_for_mutations: false,
            ..Settings::default()
        });
        assert_eq!(
            p.authorize("devices", "rebootDevice", true, false),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
        assert_eq!(
            p.authorize("networks", "deleteNetwork", true, false),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
        // The qualified entry pins one section only.
        assert_eq!(p.authorize("devices", "deleteNetwork", true, false), Decision::Allow);
    }

    #[test]
    fn deny_wins_over_allow() {
        let p = engine(Settings {
            allow_sections: vec!["devices".into()],
            deny_sections: vec!["devices".into()],
            ..Settings::default()
        });
        assert_eq!(
            p.authorize("devices", "getDevice", false, false),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
    }

    #[test]
    fn allow_list_switches_to_default_deny() {
        let p = engine(Settings {
            allow_sections: vec!["organizations".into()],
            ..Settings::default()
        });
        assert_eq!(
            p.authorize("organizations", "getOrganizations", false, false),
            Decision::Allow
        );
        assert_eq!(
            p.authorize("devices", "getDevice", false, false),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
    }

    #[test]
    fn allow_methods_accept_bare_and_qualified() {
        let p = engine(Settings {
            allow_methods: vec!["getDevice".into(), "networks.getNetworkClients".into()],
            ..Settings::default()
        });
        assert_eq!(p.authorize("devices", "getDevice", false, false), Decision::Allow);
        assert_eq!(
            p.authorize("networks", "getNetworkClients", false, false),
            Decision::Allow
        );
        assert_eq!(
            p.authorize("networks", "getNetwork", false, false),
            Decision::Deny {
                kind: DenyKind::Blocked
            }
        );
    }

    #[test]
    fn allow_listed_mutation_still_hits_mutation_gate() {
        let p = engine(Settings {
            allow_sections: vec!["networks".into()],
            allow_mutations: false,
            ..Settings::default()
        });
        assert_eq!(
            p.authorize("networks", "updateNetwork", true, true),
            Decision::Deny {
                kind: DenyKind::MutationsDisabled
            }
        );
    }
}
