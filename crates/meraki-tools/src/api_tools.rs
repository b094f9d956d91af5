//! Dynamic dashboard tools: discovery, signature inspection, and execution.
//!
//! These are the policy-gated tools. `execute_meraki_api_endpoint` is the
//! only way a caller reaches an arbitrary dashboard method, and every call
//! goes through the [`DynamicExecutor`] pipeline. Gateway failures come back
//! as structured JSON error payloads (`{"error", "message", ...context}`),
//! never as raised errors, so a denied or malformed call cannot take the
//! server down.

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Map, Value};

use meraki_dashboard::EndpointRegistry;
use meraki_gateway::DynamicExecutor;
use meraki_types::{DenyKind, GatewayError};

use crate::definition::{ToolDefinition, ToolOutput};
use crate::registry::ToolRegistry;

/// Register the five dynamic API tools.
pub fn register_api_tools(
    tools: &ToolRegistry,
    executor: Arc<DynamicExecutor>,
    registry: Arc<EndpointRegistry>,
) -> Result<()> {
    tools.register(Box::new(ListSectionsTool {
        registry: Arc::clone(&registry),
    }))?;
    tools.register(Box::new(ListMethodsTool {
        registry: Arc::clone(&registry),
    }))?;
    tools.register(Box::new(SearchEndpointsTool { registry }))?;
    tools.register(Box::new(GetEndpointParametersTool {
        executor: Arc::clone(&executor),
    }))?;
    tools.register(Box::new(ExecuteEndpointTool { executor }))?;
    Ok(())
}

/// Build the JSON error payload for a gateway failure.
///
/// The `error` field is the short machine-readable code; confirmation
/// denials carry a `note`/`example` pair telling the caller how to proceed.
fn error_payload(section: &str, method: &str, err: &GatewayError) -> Value {
    let mut payload = json!({
        "error": err.code(),
        "message": format!("{section}.{method}: {err}"),
        "section": section,
        "method": method,
    });
    if let GatewayError::PolicyDenied {
        kind: DenyKind::ConfirmationRequired,
    } = err
    {
        payload["note"] =
            json!("This method mutates dashboard state and must be confirmed explicitly.");
        payload["example"] = json!({"kwargs": "{\"confirm\": true}"});
    }
    payload
}

fn invalid_arguments(message: &str, example: Option<&str>) -> Value {
    let mut payload = json!({
        "error": "invalid arguments",
        "message": message,
    });
    if let Some(example) = example {
        payload["example"] = json!(example);
    }
    payload
}

fn require_str<'a>(input: &'a Value, field: &str) -> Result<&'a str, Value> {
    input
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid_arguments(&format!("'{field}' is required"), None))
}

// ---------------------------------------------------------------------------
// list_meraki_api_sections
// ---------------------------------------------------------------------------

struct ListSectionsTool {
    registry: Arc<EndpointRegistry>,
}

#[async_trait::async_trait]
impl ToolDefinition for ListSectionsTool {
    fn name(&self) -> &str {
        "list_meraki_api_sections"
    }

    fn description(&self) -> &str {
        "List the Meraki API sections available through the gateway, with the \
         number of callable methods in each. Use this first to discover where \
         an endpoint lives."
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput> {
        let sections: Vec<Value> = self
            .registry
            .sections()
            .into_iter()
            .map(|(name, count)| json!({"section": name, "methods": count}))
            .collect();
        Ok(ToolOutput::new(json!({
            "count": sections.len(),
            "sections": sections,
        })))
    }
}

// ---------------------------------------------------------------------------
// list_meraki_api_methods
// ---------------------------------------------------------------------------

struct ListMethodsTool {
    registry: Arc<EndpointRegistry>,
}

#[async_trait::async_trait]
impl ToolDefinition for ListMethodsTool {
    fn name(&self) -> &str {
        "list_meraki_api_methods"
    }

    fn description(&self) -> &str {
        "List the methods of one Meraki API section, with their read/mutate \
         classification."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "section": {"type": "string", "description": "Section name, e.g. \"devices\""}
            },
            "required": ["section"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let section = match require_str(&input, "section") {
            Ok(s) => s,
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };

        match self.registry.methods(section) {
            Ok(methods) => {
                let methods: Vec<Value> = methods
                    .into_iter()
                    .map(|c| json!({"method": c.name(), "mutating": c.is_mutating()}))
                    .collect();
                Ok(ToolOutput::new(json!({
                    "section": section,
                    "count": methods.len(),
                    "methods": methods,
                })))
            }
            Err(err) => Ok(ToolOutput::new(json!({
                "error": err.code(),
                "message": err.to_string(),
                "section": section,
            }))),
        }
    }
}

// ---------------------------------------------------------------------------
// search_meraki_api_endpoints
// ---------------------------------------------------------------------------

struct SearchEndpointsTool {
    registry: Arc<EndpointRegistry>,
}

#[async_trait::async_trait]
impl ToolDefinition for SearchEndpointsTool {
    fn name(&self) -> &str {
        "search_meraki_api_endpoints"
    }

    fn description(&self) -> &str {
        "Search Meraki API endpoints by case-insensitive substring over \
         qualified section.method names (e.g. \"firewall\" or \"devices.get\")."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Substring to search for"}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let query = match require_str(&input, "query") {
            Ok(s) => s,
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };

        let matches: Vec<Value> = self
            .registry
            .search(query)
            .into_iter()
            .map(|c| {
                json!({
                    "section": c.section(),
                    "method": c.name(),
                    "mutating": c.is_mutating(),
                })
            })
            .collect();

        Ok(ToolOutput::new(json!({
            "query": query,
            "count": matches.len(),
            "matches": matches,
        })))
    }
}

// ---------------------------------------------------------------------------
// get_meraki_endpoint_parameters
// ---------------------------------------------------------------------------

struct GetEndpointParametersTool {
    executor: Arc<DynamicExecutor>,
}

#[async_trait::async_trait]
impl ToolDefinition for GetEndpointParametersTool {
    fn name(&self) -> &str {
        "get_meraki_endpoint_parameters"
    }

    fn description(&self) -> &str {
        "Report the expected parameters of a Meraki API method without \
         executing it: each parameter's name, whether it is required, and \
         its default when one exists."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "section": {"type": "string", "description": "Section name, e.g. \"devices\""},
                "method": {"type": "string", "description": "Method name, e.g. \"getDevice\""}
            },
            "required": ["section", "method"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let section = match require_str(&input, "section") {
            Ok(s) => s,
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };
        let method = match require_str(&input, "method") {
            Ok(s) => s,
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };

        let result = match self.executor.describe(section, method) {
            Ok(payload) => payload,
            Err(err) => error_payload(section, method, &err),
        };
        Ok(ToolOutput::new(result))
    }
}

// ---------------------------------------------------------------------------
// execute_meraki_api_endpoint
// ---------------------------------------------------------------------------

struct ExecuteEndpointTool {
    executor: Arc<DynamicExecutor>,
}

impl ExecuteEndpointTool {
    /// Assemble keyword arguments and the confirmation flag from the tool
    /// input.
    ///
    /// Arguments come from two places: extra top-level properties, and the
    /// `kwargs` JSON-object string (which wins on conflicts). A `confirm`
    /// key in either position is honored and stripped from the argument map
    /// before invocation.
    fn build_arguments(input: &Map<String, Value>) -> Result<(Map<String, Value>, bool), Value> {
        let mut args = Map::new();
        for (key, value) in input {
            if matches!(key.as_str(), "section" | "method" | "confirm" | "kwargs") {
                continue;
            }
            args.insert(key.clone(), value.clone());
        }

        match input.get("kwargs") {
            None | Some(Value::Null) => {}
            Some(Value::String(raw)) if raw.trim().is_empty() => {}
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(parsed)) => args.extend(parsed),
                Ok(_) => {
                    return Err(invalid_arguments(
                        "kwargs must be a JSON object string",
                        Some("{\"name\": \"New Name\"}"),
                    ))
                }
                Err(e) => {
                    return Err(invalid_arguments(
                        &format!("kwargs is not valid JSON: {e}"),
                        Some("{\"name\": \"New Name\"}"),
                    ))
                }
            },
            // Tolerate callers that pass the object directly.
            Some(Value::Object(parsed)) => args.extend(parsed.clone()),
            Some(_) => {
                return Err(invalid_arguments(
                    "kwargs must be a JSON object string",
                    Some("{\"name\": \"New Name\"}"),
                ))
            }
        }

        let mut confirm = input.get("confirm").and_then(Value::as_bool).unwrap_or(false);
        if let Some(flag) = args.remove("confirm") {
            confirm = confirm || flag.as_bool().unwrap_or(false);
        }

        Ok((args, confirm))
    }
}

#[async_trait::async_trait]
impl ToolDefinition for ExecuteEndpointTool {
    fn name(&self) -> &str {
        "execute_meraki_api_endpoint"
    }

    fn description(&self) -> &str {
        "Execute a Meraki API method through the policy gateway. Pass \
         arguments as extra properties or as a `kwargs` JSON object string. \
         Mutating methods are subject to the mutation policy and may require \
         `confirm=true`. Responses have sensitive fields redacted."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "section": {"type": "string", "description": "Section name, e.g. \"devices\""},
                "method": {"type": "string", "description": "Method name, e.g. \"getDevice\""},
                "confirm": {
                    "type": "boolean",
                    "description": "Explicit confirmation for mutating methods",
                    "default": false
                },
                "kwargs": {
                    "type": "string",
                    "description": "Keyword arguments as a JSON object string, e.g. \"{\\\"serial\\\": \\\"Q2XX\\\"}\""
                }
            },
            "required": ["section", "method"],
            "additionalProperties": true
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let section = match require_str(&input, "section") {
            Ok(s) => s.to_string(),
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };
        let method = match require_str(&input, "method") {
            Ok(s) => s.to_string(),
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };

        let empty = Map::new();
        let input_obj = input.as_object().unwrap_or(&empty);
        let (args, confirm) = match Self::build_arguments(input_obj) {
            Ok(pair) => pair,
            Err(payload) => return Ok(ToolOutput::new(payload)),
        };

        let result = match self.executor.execute(&section, &method, args, confirm).await {
            Ok(payload) => payload,
            Err(err) => error_payload(&section, &method, &err),
        };
        Ok(ToolOutput::new(result))
    }
}
