//! Section/method resolution over the static endpoint catalog.
//!
//! [`EndpointRegistry`] is built once at startup from [`CATALOG`] and is the
//! single resolve/invoke boundary the rest of the system depends on. Each
//! [`Capability`] caches its mutation classification so the policy engine
//! never re-derives it per request.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use meraki_types::{ClassificationOverrides, GatewayError};

use crate::catalog::{EndpointSpec, ParamSpec, CATALOG};
use crate::transport::{ApiCall, DashboardTransport};

/// One resolved dashboard capability.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    section: &'static str,
    spec: &'static EndpointSpec,
    mutating: bool,
}

impl Capability {
    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Qualified `section.method` name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.section, self.spec.name)
    }

    /// Ordered parameter table (the signature-inspection source).
    pub fn params(&self) -> &'static [ParamSpec] {
        self.spec.params
    }

    pub fn is_mutating(&self) -> bool {
        self.mutating
    }

    pub fn verb(&self) -> crate::catalog::HttpVerb {
        self.spec.verb
    }

    /// Invoke the capability through a transport with keyword arguments.
    ///
    /// Path placeholders are substituted from `args`; everything else goes
    /// to the query string (GET/DELETE) or the JSON body (POST/PUT).
    /// Arguments the catalog does not declare are passed through untouched;
    /// the dashboard is the authority on rejecting them.
    pub async fn invoke(
        &self,
        transport: &dyn DashboardTransport,
        args: &Map<String, Value>,
    ) -> Result<Value> {
        let mut path = String::with_capacity(self.spec.path.len());
        let mut path_params: Vec<&str> = Vec::new();
        let mut rest = self.spec.path;

        while let Some(start) = rest.find('{') {
            let Some(end) = rest[start..].find('}') else {
                bail!("malformed path template: {}", self.spec.path);
            };
            let name = &rest[start + 1..start + end];
            path.push_str(&rest[..start]);
            match args.get(name) {
                Some(value) => path.push_str(&scalar_to_string(value)),
                None => bail!("missing path parameter: {name}"),
            }
            path_params.push(name);
            rest = &rest[start + end + 1..];
        }
        path.push_str(rest);

        let mut query = Vec::new();
        let mut body = Map::new();
        for (name, value) in args {
            if path_params.contains(&name.as_str()) {
                continue;
            }
            if self.spec.verb.has_body() {
                body.insert(name.clone(), value.clone());
            } else {
                query.push((name.clone(), scalar_to_string(value)));
            }
        }

        let call = ApiCall {
            verb: self.spec.verb,
            path,
            query,
            body: if self.spec.verb.has_body() {
                Some(Value::Object(body))
            } else {
                None
            },
        };

        transport.send(call).await
    }
}

/// Stringify an argument for a URL segment or query value.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Resolves `(section, method)` pairs against the catalog.
pub struct EndpointRegistry {
    sections: BTreeMap<&'static str, BTreeMap<&'static str, Capability>>,
}

impl EndpointRegistry {
    /// Build the registry with the default mutation heuristic.
    pub fn new() -> Self {
        Self::with_overrides(&ClassificationOverrides::new())
    }

    /// Build the registry, applying operator classification overrides.
    pub fn with_overrides(overrides: &ClassificationOverrides) -> Self {
        let mut sections = BTreeMap::new();
        for section in CATALOG {
            let mut methods = BTreeMap::new();
            for spec in section.endpoints {
                methods.insert(
                    spec.name,
                    Capability {
                        section: section.name,
                        spec,
                        mutating: overrides.classify(spec.name),
                    },
                );
            }
            sections.insert(section.name, methods);
        }
        Self { sections }
    }

    /// Resolve a capability or fail with `SectionNotFound` / `MethodNotFound`.
    pub fn resolve(&self, section: &str, method: &str) -> Result<&Capability, GatewayError> {
        let methods = self
            .sections
            .get(section)
            .ok_or_else(|| GatewayError::SectionNotFound {
                section: section.to_string(),
            })?;
        methods.get(method).ok_or_else(|| GatewayError::MethodNotFound {
            section: section.to_string(),
            method: method.to_string(),
        })
    }

    /// Section names with their method counts, sorted by name.
    pub fn sections(&self) -> Vec<(&'static str, usize)> {
        self.sections.iter().map(|(name, m)| (*name, m.len())).collect()
    }

    /// Capabilities of one section, sorted by method name.
    pub fn methods(&self, section: &str) -> Result<Vec<&Capability>, GatewayError> {
        let methods = self
            .sections
            .get(section)
            .ok_or_else(|| GatewayError::SectionNotFound {
                section: section.to_string(),
            })?;
        Ok(methods.values().collect())
    }

    /// Case-insensitive substring search over qualified names.
    pub fn search(&self, query: &str) -> Vec<&Capability> {
        let needle = query.to_lowercase();
        self.sections
            .values()
            .flat_map(|methods| methods.values())
            .filter(|c| c.qualified_name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Total capability count across all sections.
    pub fn capability_count(&self) -> usize {
        self.sections.values().map(|m| m.len()).sum()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
