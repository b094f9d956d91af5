//! Policy-and-safety gateway in front of dynamic dashboard execution.
//!
//! This crate is the authorization-critical core. A call flows through
//! [`DynamicExecutor`] as: resolve capability, classify read/mutate,
//! authorize ([`PolicyEngine`]), validate required parameters, clamp
//! guardrails, invoke, redact ([`Redactor`]), serialize. Every outcome is
//! recorded through an injected [`AuditSink`].
//!
//! Nothing in here holds mutable shared state except the optional
//! [`ResponseCache`], which sits strictly after the policy engine and the
//! redactor and is synchronized on its own.

pub mod cache;
pub mod executor;
pub mod guardrails;
pub mod policy;
pub mod redaction;

pub use cache::ResponseCache;
pub use executor::{ApiAuditRecord, AuditSink, DynamicExecutor, TracingAuditSink};
pub use guardrails::{clamp_arguments, PER_PAGE_PARAM, TIMESPAN_PARAM};
pub use policy::{Decision, PolicyEngine};
pub use redaction::{Redactor, REDACTED};
