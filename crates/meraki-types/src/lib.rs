//! Core types shared across all Meraki MCP crates.
//!
//! Defines the environment-sourced [`Settings`], the [`GatewayError`]
//! taxonomy, and the mutating-method classification used by the dashboard
//! registry and the policy engine.

pub mod classification;
pub mod error;
pub mod settings;

pub use classification::{is_mutating_method, ClassificationOverrides, MUTATING_PREFIXES};
pub use error::{DenyKind, GatewayError};
pub use settings::Settings;
