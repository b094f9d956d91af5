//! Error types shared across all Meraki MCP crates.

/// Why the policy engine denied a call.
///
/// The three kinds map to distinct caller remediations: a deny-list block is
/// an operator decision, a disabled-mutations block needs `ALLOW_MUTATIONS`,
/// and a missing confirmation just needs the call retried with
/// `confirm=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyKind {
    /// The section or method is on a deny-list, or an allow-list is
    /// configured and does not include it.
    Blocked,
    /// The method mutates state and `ALLOW_MUTATIONS` is off.
    MutationsDisabled,
    /// The method mutates state and the call did not carry `confirm=true`.
    ConfirmationRequired,
}

impl DenyKind {
    /// The stable short code surfaced in error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            DenyKind::Blocked => "execution blocked",
            DenyKind::MutationsDisabled => "mutations are disabled",
            DenyKind::ConfirmationRequired => "confirmation required",
        }
    }
}

impl std::fmt::Display for DenyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures the gateway can surface for a single invocation.
///
/// Every variant is recoverable by the caller: public tools catch these at
/// their boundary and answer with a structured JSON error object, so one bad
/// call never takes the server down.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The requested API section does not exist in the registry.
    #[error("unknown API section: {section}")]
    SectionNotFound { section: String },

    /// The section exists but has no method with this name.
    #[error("unknown method {method} in section {section}")]
    MethodNotFound { section: String, method: String },

    /// The policy engine refused the call.
    #[error("{kind}")]
    PolicyDenied { kind: DenyKind },

    /// A parameter the capability requires was absent from the request.
    #[error("missing required parameter: {name}")]
    MissingRequiredParameter { name: String },

    /// The underlying dashboard call failed (network error, 4xx/5xx, or a
    /// rejection the vendor produced). The vendor message is preserved for
    /// diagnosis.
    #[error("API call failed: {message}")]
    UpstreamCallFailed { message: String },
}

impl GatewayError {
    /// Short machine-readable code for the `error` field of a JSON error
    /// payload.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::SectionNotFound { .. } => "unknown section",
            GatewayError::MethodNotFound { .. } => "unknown method",
            GatewayError::PolicyDenied { kind } => kind.as_str(),
            GatewayError::MissingRequiredParameter { .. } => "missing required parameter",
            GatewayError::UpstreamCallFailed { .. } => "API call failed",
        }
    }
}
