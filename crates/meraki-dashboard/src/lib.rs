//! Meraki Dashboard API binding: transport, endpoint catalog, and registry.
//!
//! This crate is the only place that knows how dashboard capabilities are
//! reached over HTTP. Everything above it depends on two narrow contracts:
//!
//! - [`DashboardTransport`] -- one async method that carries an [`ApiCall`]
//!   to the dashboard and returns the JSON response.
//! - [`EndpointRegistry`] -- resolves `(section, method)` pairs to
//!   [`Capability`] entries carrying parameter metadata and the route.
//!
//! The catalog is a static table; adding an endpoint is one catalog line.

pub mod catalog;
pub mod registry;
pub mod transport;

pub use catalog::{DefaultValue, EndpointSpec, HttpVerb, ParamSpec, SectionSpec, CATALOG};
pub use registry::{Capability, EndpointRegistry};
pub use transport::{ApiCall, DashboardTransport, HttpTransport, DEFAULT_BASE_URL};
