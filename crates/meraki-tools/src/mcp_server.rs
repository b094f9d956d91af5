//! MCP (Model Context Protocol) stdio server.
//!
//! Exposes registered tools to agents via JSON-RPC 2.0 over stdin/stdout.
//! Each line on stdin is a JSON-RPC request; each response is written as a
//! single line on stdout.
//!
//! Routed protocol methods:
//! - `initialize` -- returns server capabilities
//! - `notifications/initialized` -- acknowledgement (no response)
//! - `tools/list` -- enumerates all registered tools
//! - `tools/call` -- executes a tool from the [`ToolRegistry`]
//!
//! Gateway failures (policy denials, unknown endpoints, upstream errors)
//! are *successful* tool results carrying a JSON error payload; JSON-RPC
//! errors are reserved for protocol-level problems (unknown tool, bad
//! params, unexpected tool panic-equivalents).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::registry::ToolRegistry;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 types
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    /// Request ID. Absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Mirrors the request ID.
    pub id: Value,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// Standard JSON-RPC error codes.
const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INTERNAL_ERROR: i64 = -32603;

// Application-specific error codes.
const TOOL_NOT_FOUND: i64 = -32000;
const TOOL_EXECUTION_ERROR: i64 = -32002;

fn response_ok(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: Some(result),
        error: None,
        id,
    }
}

fn response_err(id: Value, code: i64, message: String) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
            data: None,
        }),
        id,
    }
}

// ---------------------------------------------------------------------------
// McpServer
// ---------------------------------------------------------------------------

/// MCP stdio server that exposes registered tools via JSON-RPC 2.0.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Run the server loop, reading from `stdin` and writing to `stdout`.
    ///
    /// Exits cleanly when stdin reaches EOF.
    pub async fn run(
        self,
        stdin: impl AsyncBufRead + Unpin,
        mut stdout: impl AsyncWrite + Unpin,
    ) -> Result<()> {
        let mut lines = stdin.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(_) => {
                    // Parse error -- respond with null id per spec.
                    let response =
                        response_err(Value::Null, PARSE_ERROR, "Parse error".to_string());
                    write_response(&mut stdout, &response).await?;
                    continue;
                }
            };

            // Notifications have no id and get no response.
            if request.id.is_none() {
                continue;
            }

            let id = request.id.clone().unwrap_or(Value::Null);

            let response = match request.method.as_str() {
                "initialize" => self.handle_initialize(id),
                "tools/list" => self.handle_tools_list(id),
                "tools/call" => self.handle_tools_call(id, request.params).await,
                _ => response_err(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", request.method),
                ),
            };

            write_response(&mut stdout, &response).await?;
        }

        // EOF on stdin -- clean exit.
        Ok(())
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        response_ok(
            id,
            serde_json::json!({
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "meraki-mcp",
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .registry
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                })
            })
            .collect();

        response_ok(id, serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return response_err(
                id,
                INTERNAL_ERROR,
                "Missing params for tools/call".to_string(),
            );
        };

        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return response_err(
                id,
                INTERNAL_ERROR,
                "Missing 'name' in tools/call params".to_string(),
            );
        };

        let Some(tool) = self.registry.get_tool(tool_name) else {
            return response_err(id, TOOL_NOT_FOUND, format!("tool not found: {tool_name}"));
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        match tool.execute(arguments).await {
            Ok(output) => {
                let text =
                    serde_json::to_string(&output.result).unwrap_or_else(|_| "{}".to_string());
                response_ok(
                    id,
                    serde_json::json!({
                        "content": [{
                            "type": "text",
                            "text": text,
                        }]
                    }),
                )
            }
            Err(exec_err) => {
                tracing::error!(tool = tool_name, error = %exec_err, "tool execution failed");
                response_err(
                    id,
                    TOOL_EXECUTION_ERROR,
                    format!("tool {tool_name} execution failed: {exec_err}"),
                )
            }
        }
    }
}

/// Write a JSON-RPC response as a single line to the writer.
async fn write_response(
    writer: &mut (impl AsyncWrite + Unpin),
    response: &JsonRpcResponse,
) -> Result<()> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ToolDefinition, ToolOutput};
    use serde_json::json;

    struct EchoTool;

    #[async_trait::async_trait]
    impl ToolDefinition for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn input_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"value": {"type": "string"}}
            })
        }

        async fn execute(&self, input: Value) -> Result<ToolOutput> {
            Ok(ToolOutput::new(json!({"echo": input})))
        }
    }

    struct FailingTool;

    #[async_trait::async_trait]
    impl ToolDefinition for FailingTool {
        fn name(&self) -> &str {
            "failing_tool"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _input: Value) -> Result<ToolOutput> {
            anyhow::bail!("intentional failure")
        }
    }

    fn make_server(tools: Vec<Box<dyn ToolDefinition>>) -> McpServer {
        let registry = ToolRegistry::new();
        for tool in tools {
            registry.register(tool).unwrap();
        }
        McpServer::new(registry)
    }

    /// Run the server over the given input lines, collect output lines.
    async fn run_server(server: McpServer, input_lines: &[&str]) -> Vec<String> {
        let mut input = String::new();
        for line in input_lines {
            input.push_str(line);
            input.push('\n');
        }

        let stdin = tokio::io::BufReader::new(std::io::Cursor::new(input.into_bytes()));
        let mut stdout_buf: Vec<u8> = Vec::new();

        server.run(stdin, &mut stdout_buf).await.unwrap();

        String::from_utf8(stdout_buf)
            .unwrap()
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect()
    }

    fn parse_response(line: &str) -> JsonRpcResponse {
        serde_json::from_str(line).expect("failed to parse response JSON")
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let server = make_server(vec![]);
        let request = json!({"jsonrpc": "2.0", "method": "initialize", "id": 1});

        let lines = run_server(server, &[&request.to_string()]).await;
        assert_eq!(lines.len(), 1);

        let resp = parse_response(&lines[0]);
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert!(result["capabilities"].get("tools").is_some());
        assert_eq!(result["serverInfo"]["name"], "meraki-mcp");
        assert_eq!(resp.id, json!(1));
    }

    #[tokio::test]
    async fn tools_list_returns_registered_tools() {
        let server = make_server(vec![Box::new(EchoTool)]);
        let request = json!({"jsonrpc": "2.0", "method": "tools/list", "id": 2});

        let lines = run_server(server, &[&request.to_string()]).await;
        let resp = parse_response(&lines[0]);
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn tools_call_executes_and_wraps_as_text_content() {
        let server = make_server(vec![Box::new(EchoTool)]);
        let request = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "echo", "arguments": {"value": "hi"}},
            "id": 3
        });

        let lines = run_server(server, &[&request.to_string()]).await;
        let resp = parse_response(&lines[0]);
        assert!(resp.error.is_none());

        let content = &resp.result.unwrap()["content"];
        assert_eq!(content[0]["type"], "text");
        let text = content[0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed["echo"]["value"], "hi");
    }

    #[tokio::test]
    async fn unknown_tool_is_a_jsonrpc_error() {
        let server = make_server(vec![]);
        let request = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "nonexistent", "arguments": {}},
            "id": 4
        });

        let lines = run_server(server, &[&request.to_string()]).await;
        let resp = parse_response(&lines[0]);
        let err = resp.error.unwrap();
        assert_eq!(err.code, TOOL_NOT_FOUND);
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn tool_error_is_a_jsonrpc_error() {
        let server = make_server(vec![Box::new(FailingTool)]);
        let request = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "failing_tool", "arguments": {}},
            "id": 5
        });

        let lines = run_server(server, &[&request.to_string()]).await;
        let resp = parse_response(&lines[0]);
        let err = resp.error.unwrap();
        assert_eq!(err.code, TOOL_EXECUTION_ERROR);
        assert!(err.message.contains("intentional failure"));
    }

    #[tokio::test]
    async fn notification_gets_no_response() {
        let server = make_server(vec![]);
        let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});

        let lines = run_server(server, &[&notification.to_string()]).await;
        assert!(lines.is_empty(), "got: {lines:?}");
    }

    #[tokio::test]
    async fn parse_error_answers_with_null_id() {
        let server = make_server(vec![]);
        let lines = run_server(server, &["this is not valid json"]).await;
        let resp = parse_response(&lines[0]);
        let err = resp.error.unwrap();
        assert_eq!(err.code, PARSE_ERROR);
        assert_eq!(resp.id, Value::Null);
    }

    #[tokio::test]
    async fn unknown_method_is_reported() {
        let server = make_server(vec![]);
        let request = json!({"jsonrpc": "2.0", "method": "resources/list", "id": 6});

        let lines = run_server(server, &[&request.to_string()]).await;
        let resp = parse_response(&lines[0]);
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn server_exits_on_eof() {
        let server = make_server(vec![]);
        let stdin = tokio::io::BufReader::new(std::io::Cursor::new(Vec::<u8>::new()));
        let mut stdout_buf: Vec<u8> = Vec::new();

        let result = server.run(stdin, &mut stdout_buf).await;
        assert!(result.is_ok());
        assert!(stdout_buf.is_empty());
    }
}
