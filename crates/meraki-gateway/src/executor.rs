//! Dynamic executor: the one path every dashboard call goes through.
//!
//! Pipeline, each step a possible failure point:
//!
//! 1. Resolve the capability (section, method) in the registry.
//! 2. Classify it read-only or mutating.
//! 3. Authorize through the [`PolicyEngine`] -- consulted exactly once per
//!    invocation, before anything can reach the dashboard.
//! 4. Validate required parameters from the capability's metadata table.
//! 5. Clamp pagination/timespan guardrails.
//! 6. Invoke the capability through the transport.
//! 7. Redact the response.
//!
//! No step after a failure executes, so a mutation can never fire before
//! authorization completes. Every outcome past resolution is recorded
//! through the injected [`AuditSink`]; audit records carry a SHA-256 digest
//! of the arguments instead of the raw (possibly secret) values.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use meraki_dashboard::{DashboardTransport, EndpointRegistry};
use meraki_types::{GatewayError, Settings};

use crate::cache::{cache_key, ResponseCache};
use crate::guardrails::clamp_arguments;
use crate::policy::{Decision, PolicyEngine};
use crate::redaction::Redactor;

// ---------------------------------------------------------------------------
// Audit sink
// ---------------------------------------------------------------------------

/// A record emitted for every executed or denied dashboard call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiAuditRecord {
    pub section: String,
    pub method: String,
    /// Classification at call time.
    pub mutating: bool,
    /// `"allow"` or `"deny"`.
    pub decision: String,
    /// SHA-256 hex digest of the serialized arguments.
    pub args_hash: String,
    /// Wall-clock time in milliseconds (0 when denied before execution).
    pub latency_ms: u64,
    pub success: bool,
    /// Whether the response was served from the cache.
    pub cached: bool,
    pub error: Option<String>,
}

/// Audit logger for dashboard calls -- injected by the host.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: ApiAuditRecord);
}

/// Default sink that writes audit records to the tracing log.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: ApiAuditRecord) {
        tracing::info!(
            section = %record.section,
            method = %record.method,
            mutating = record.mutating,
            decision = %record.decision,
            args_hash = %record.args_hash,
            latency_ms = record.latency_ms,
            success = record.success,
            cached = record.cached,
            error = record.error.as_deref().unwrap_or(""),
            "dashboard call"
        );
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Orchestrates registry resolution, policy, guardrails, invocation, and
/// redaction for dynamic dashboard calls.
pub struct DynamicExecutor {
    registry: Arc<EndpointRegistry>,
    transport: Arc<dyn DashboardTransport>,
    settings: Arc<Settings>,
    policy: PolicyEngine,
    redactor: Redactor,
    cache: Option<ResponseCache>,
    audit_sink: Arc<dyn AuditSink>,
}

impl DynamicExecutor {
    /// Build an executor with the default tracing audit sink.
    pub fn new(
        registry: Arc<EndpointRegistry>,
        transport: Arc<dyn DashboardTransport>,
        settings: Arc<Settings>,
    ) -> Self {
        Self::with_audit_sink(registry, transport, settings, Arc::new(TracingAuditSink))
    }

    /// Build an executor with a custom audit sink.
    pub fn with_audit_sink(
        registry: Arc<EndpointRegistry>,
        transport: Arc<dyn DashboardTransport>,
        settings: Arc<Settings>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        let policy = PolicyEngine::new(Arc::clone(&settings));
        let redactor = Redactor::from_settings(&settings);
        let cache = ResponseCache::from_settings(&settings);
        Self {
            registry,
            transport,
            settings,
            policy,
            redactor,
            cache,
            audit_sink,
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Describe a capability's expected parameters without executing it.
    ///
    /// Shape: `{"section", "method", "parameters": {name: {"required", "default"}}}`.
    pub fn describe(&self, section: &str, method: &str) -> Result<Value, GatewayError> {
        let capability = self.registry.resolve(section, method)?;

        let mut parameters = Map::new();
        for param in capability.params() {
            parameters.insert(
                param.name.to_string(),
                json!({
                    "required": param.required,
                    "default": param.default.map(|d| d.to_json()).unwrap_or(Value::Null),
                }),
            );
        }

        Ok(json!({
            "section": section,
            "method": method,
            "parameters": parameters,
        }))
    }

    /// Execute a capability through the full gateway pipeline.
    pub async fn execute(
        &self,
        section: &str,
        method: &str,
        args: Map<String, Value>,
        confirm: bool,
    ) -> Result<Value, GatewayError> {
        // 1. Resolve. Unknown names never reach the audit log -- there is
        // nothing to attribute the call to.
        let capability = self.registry.resolve(section, method)?;

        // 2. Classify.
        let mutating = capability.is_mutating();
        let args_hash = hash_args(&args);

        // 3. Authorize. This is the only policy consultation for this call.
        if let Decision::Deny { kind } = self.policy.authorize(section, method, mutating, confirm) {
            let err = GatewayError::PolicyDenied { kind };
            self.audit_denied(section, method, mutating, &args_hash, &err);
            return Err(err);
        }

        // 4. Required parameters, from the capability metadata table.
        for param in capability.params() {
            if param.required && !args.contains_key(param.name) {
                let err = GatewayError::MissingRequiredParameter {
                    name: param.name.to_string(),
                };
                self.audit_denied(section, method, mutating, &args_hash, &err);
                return Err(err);
            }
        }

        // 5. Guardrails.
        let args = clamp_arguments(&args, &self.settings);

        // 6. Cache, read-only calls only, strictly after authorization.
        let key = (!mutating && self.cache.is_some()).then(|| cache_key(section, method, &args));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                self.audit_sink.record(ApiAuditRecord {
                    section: section.to_string(),
                    method: method.to_string(),
                    mutating,
                    decision: "allow".to_string(),
                    args_hash,
                    latency_ms: 0,
                    success: true,
                    cached: true,
                    error: None,
                });
                return Ok(hit);
            }
        }

        // 7. Invoke.
        let start = Instant::now();
        let raw = match capability.invoke(self.transport.as_ref(), &args).await {
            Ok(value) => value,
            Err(upstream) => {
                let err = GatewayError::UpstreamCallFailed {
                    message: upstream.to_string(),
                };
                self.audit_sink.record(ApiAuditRecord {
                    section: section.to_string(),
                    method: method.to_string(),
                    mutating,
                    decision: "allow".to_string(),
                    args_hash,
                    latency_ms: start.elapsed().as_millis() as u64,
                    success: false,
                    cached: false,
                    error: Some(err.to_string()),
                });
                return Err(err);
            }
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        // 8. Redact, then (for reads) cache the redacted value.
        let redacted = self.redactor.redact(&raw);
        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.put(key, redacted.clone());
        }

        self.audit_sink.record(ApiAuditRecord {
            section: section.to_string(),
            method: method.to_string(),
            mutating,
            decision: "allow".to_string(),
            args_hash,
            latency_ms,
            success: true,
            cached: false,
            error: None,
        });

        Ok(redacted)
    }

    fn audit_denied(
        &self,
        section: &str,
        method: &str,
        mutating: bool,
        args_hash: &str,
        err: &GatewayError,
    ) {
        self.audit_sink.record(ApiAuditRecord {
            section: section.to_string(),
            method: method.to_string(),
            mutating,
            decision: "deny".to_string(),
            args_hash: args_hash.to_string(),
            latency_ms: 0,
            success: false,
            cached: false,
            error: Some(err.to_string()),
        });
    }
}

/// SHA-256 hex digest of the argument map in sorted-key order.
fn hash_args(args: &Map<String, Value>) -> String {
    let mut sorted: Vec<(&String, &Value)> = args.iter().collect();
    sorted.sort_by_key(|(k, _)| k.as_str());

    let mut hasher = Sha256::new();
    for (k, v) in sorted {
        hasher.update(k.as_bytes());
        hasher.update([0]);
        hasher.update(v.to_string().as_bytes());
        hasher.update([0]);
    }
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
