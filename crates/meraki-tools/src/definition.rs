//! Core tool abstraction: the [`ToolDefinition`] trait and [`ToolInfo`].
//!
//! Every MCP-visible operation implements [`ToolDefinition`]. Tools never
//! raise for gateway failures -- they encode them as structured JSON error
//! payloads in their result, so the host process survives any single bad
//! call. An `Err` from [`ToolDefinition::execute`] is reserved for genuinely
//! unexpected conditions and surfaces as a JSON-RPC error.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool the MCP host can invoke.
///
/// Implementations must be `Send + Sync` so the registry can hand out
/// `Arc<dyn ToolDefinition>` across tasks.
#[async_trait::async_trait]
pub trait ToolDefinition: Send + Sync {
    /// Unique name (alphanumeric + underscores, max 64 chars).
    fn name(&self) -> &str;

    /// Short description shown in `tools/list`.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input object.
    fn input_schema(&self) -> Value;

    /// Run the tool. Gateway failures are encoded into the output payload,
    /// not returned as `Err`.
    async fn execute(&self, input: Value) -> Result<ToolOutput>;
}

/// Structured output of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    /// The JSON payload handed back to the MCP client.
    pub result: Value,
}

impl ToolOutput {
    pub fn new(result: Value) -> Self {
        Self { result }
    }
}

/// Summary information about a registered tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

const MAX_TOOL_NAME_LEN: usize = 64;

/// Validate that a tool name is non-empty, at most [`MAX_TOOL_NAME_LEN`]
/// characters, and contains only alphanumerics and underscores.
pub fn validate_tool_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("tool name must not be empty");
    }
    if name.len() > MAX_TOOL_NAME_LEN {
        anyhow::bail!("tool name exceeds maximum length of {MAX_TOOL_NAME_LEN} characters: {name}");
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!("tool name must contain only alphanumeric characters and underscores: {name}");
    }
    Ok(())
}

/// Validate that an input schema is a JSON object with a `"type"` field.
pub fn validate_input_schema(schema: &Value) -> Result<()> {
    let obj = schema
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("input schema must be a JSON object"))?;
    if !obj.contains_key("type") {
        anyhow::bail!("input schema must contain a \"type\" field");
    }
    Ok(())
}
