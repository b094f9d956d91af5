//! Fixed convenience tools for commonly used dashboard endpoints.
//!
//! These offer direct access to popular calls without the discovery round
//! trip. They are deliberately thin 1:1 passthroughs with no policy logic:
//! each maps typed tool arguments onto one catalog capability and wraps the
//! response as `{"method", ...context, <payload key>: data}`. Anything
//! policy-relevant belongs in `execute_meraki_api_endpoint`.
//!
//! The whole surface is table-driven: one [`PassthroughTool`] type,
//! instantiated per [`COMMON_TOOLS`] entry.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde_json::{json, Map, Value};

use meraki_dashboard::{Capability, DashboardTransport, EndpointRegistry};

use crate::definition::{ToolDefinition, ToolOutput};
use crate::registry::ToolRegistry;

/// One typed argument of a convenience tool.
pub struct PassArg {
    /// Tool-facing argument name (snake_case).
    pub name: &'static str,
    /// Dashboard parameter it maps to (SDK camelCase).
    pub param: &'static str,
    /// JSON Schema type for the tool input.
    pub ty: &'static str,
    pub required: bool,
}

impl PassArg {
    const fn required(name: &'static str, param: &'static str) -> Self {
        Self {
            name,
            param,
            ty: "string",
            required: true,
        }
    }

    const fn optional_int(name: &'static str, param: &'static str) -> Self {
        Self {
            name,
            param,
            ty: "integer",
            required: false,
        }
    }
}

/// Static description of one convenience tool.
pub struct PassthroughSpec {
    pub tool_name: &'static str,
    pub description: &'static str,
    pub section: &'static str,
    pub method: &'static str,
    pub args: &'static [PassArg],
    /// Key the upstream payload lands under in the wrapped result.
    pub payload_key: &'static str,
}

/// The convenience tool table, mirroring the most commonly used endpoints.
pub const COMMON_TOOLS: &[PassthroughSpec] = &[
    PassthroughSpec {
        tool_name: "get_organizations",
        description: "Get all organizations accessible by the API key. Usually the first \
                      call, to discover organization IDs for everything else.",
        section: "organizations",
        method: "getOrganizations",
        args: &[],
        payload_key: "organizations",
    },
    PassthroughSpec {
        tool_name: "get_organization_devices",
        description: "Get all devices in an organization, across all of its networks.",
        section: "organizations",
        method: "getOrganizationDevices",
        args: &[
            PassArg::required("organization_id", "organizationId"),
            PassArg::optional_int("per_page", "perPage"),
        ],
        payload_key: "devices",
    },
    PassthroughSpec {
        tool_name: "get_organization_networks",
        description: "Get all networks in an organization.",
        section: "organizations",
        method: "getOrganizationNetworks",
        args: &[
            PassArg::required("organization_id", "organizationId"),
            PassArg::optional_int("per_page", "perPage"),
        ],
        payload_key: "networks",
    },
    PassthroughSpec {
        tool_name: "get_device_status",
        description: "Get a single device by serial, including its current attributes.",
        section: "devices",
        method: "getDevice",
        args: &[PassArg::required("serial", "serial")],
        payload_key: "device",
    },
    PassthroughSpec {
        tool_name: "get_network_clients",
        description: "List the clients that have used a network within the timespan.",
        section: "networks",
        method: "getNetworkClients",
        args: &[
            PassArg::required("network_id", "networkId"),
            PassArg::optional_int("timespan", "timespan"),
            PassArg::optional_int("per_page", "perPage"),
        ],
        payload_key: "clients",
    },
    PassthroughSpec {
        tool_name: "get_switch_port_config",
        description: "Get the configuration of one switch port.",
        section: "switch",
        method: "getDeviceSwitchPort",
        args: &[
            PassArg::required("serial", "serial"),
            PassArg::required("port_id", "portId"),
        ],
        payload_key: "port_config",
    },
    PassthroughSpec {
        tool_name: "get_network_settings",
        description: "Get the settings of a network.",
        section: "networks",
        method: "getNetworkSettings",
        args: &[PassArg::required("network_id", "networkId")],
        payload_key: "settings",
    },
    PassthroughSpec {
        tool_name: "get_firewall_rules",
        description: "Get the L3 firewall rules of a network's appliance.",
        section: "appliance",
        method: "getNetworkApplianceFirewallL3FirewallRules",
        args: &[PassArg::required("network_id", "networkId")],
        payload_key: "firewall_rules",
    },
    PassthroughSpec {
        tool_name: "get_organization_uplinks_statuses",
        description: "Get the uplink status of every device in an organization.",
        section: "organizations",
        method: "getOrganizationUplinksStatuses",
        args: &[
            PassArg::required("organization_id", "organizationId"),
            PassArg::optional_int("per_page", "perPage"),
        ],
        payload_key: "uplinks",
    },
    PassthroughSpec {
        tool_name: "get_network_topology",
        description: "Get the link-layer topology of a network.",
        section: "networks",
        method: "getNetworkTopologyLinkLayer",
        args: &[PassArg::required("network_id", "networkId")],
        payload_key: "topology",
    },
    PassthroughSpec {
        tool_name: "administered_get_identity",
        description: "Get the identity associated with the current API key.",
        section: "administered",
        method: "getAdministeredIdentitiesMe",
        args: &[],
        payload_key: "identity",
    },
    PassthroughSpec {
        tool_name: "administered_list_api_keys",
        description: "List metadata of the API keys belonging to the current identity.",
        section: "administered",
        method: "getAdministeredIdentitiesMeApiKeys",
        args: &[],
        payload_key: "api_keys",
    },
    PassthroughSpec {
        tool_name: "administered_generate_api_key",
        description: "Generate a new API key for the current identity.",
        section: "administered",
        method: "generateAdministeredIdentitiesMeApiKeys",
        args: &[],
        payload_key: "response",
    },
    PassthroughSpec {
        tool_name: "administered_revoke_api_key",
        description: "Revoke an API key of the current identity by its suffix.",
        section: "administered",
        method: "revokeAdministeredIdentitiesMeApiKeys",
        args: &[PassArg::required("suffix", "suffix")],
        payload_key: "response",
    },
];

/// Register every [`COMMON_TOOLS`] entry against the tool registry.
///
/// Fails if a table entry references a capability the catalog does not
/// carry -- that is a programming error the catalog tests also catch.
pub fn register_common_tools(
    tools: &ToolRegistry,
    endpoints: &EndpointRegistry,
    transport: Arc<dyn DashboardTransport>,
) -> Result<()> {
    for spec in COMMON_TOOLS {
        let capability = match endpoints.resolve(spec.section, spec.method) {
            Ok(c) => *c,
            Err(e) => bail!("convenience tool {} has no capability: {e}", spec.tool_name),
        };
        tools.register(Box::new(PassthroughTool {
            spec,
            capability,
            transport: Arc::clone(&transport),
        }))?;
    }
    Ok(())
}

/// A convenience tool: typed arguments, one capability, wrapped result.
pub struct PassthroughTool {
    spec: &'static PassthroughSpec,
    capability: Capability,
    transport: Arc<dyn DashboardTransport>,
}

#[async_trait::async_trait]
impl ToolDefinition for PassthroughTool {
    fn name(&self) -> &str {
        self.spec.tool_name
    }

    fn description(&self) -> &str {
        self.spec.description
    }

    fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for arg in self.spec.args {
            properties.insert(arg.name.to_string(), json!({"type": arg.ty}));
            if arg.required {
                required.push(Value::from(arg.name));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        // Map tool arguments onto dashboard parameters.
        let mut args = Map::new();
        let mut context = Map::new();
        for arg in self.spec.args {
            match input.get(arg.name) {
                Some(Value::Null) | None if arg.required => {
                    return Ok(ToolOutput::new(json!({
                        "error": "invalid arguments",
                        "message": format!("'{}' is required", arg.name),
                        "method": self.spec.method,
                    })));
                }
                Some(Value::Null) | None => {}
                Some(value) => {
                    args.insert(arg.param.to_string(), value.clone());
                    context.insert(arg.name.to_string(), value.clone());
                }
            }
        }

        match self.capability.invoke(self.transport.as_ref(), &args).await {
            Ok(payload) => {
                let mut result = Map::new();
                result.insert("method".to_string(), json!(self.spec.method));
                result.extend(context);
                if let Value::Array(items) = &payload {
                    result.insert("count".to_string(), json!(items.len()));
                }
                result.insert(self.spec.payload_key.to_string(), payload);
                Ok(ToolOutput::new(Value::Object(result)))
            }
            Err(e) => {
                tracing::error!(tool = self.spec.tool_name, error = %e, "API call failed");
                let mut result = Map::new();
                result.insert("error".to_string(), json!("API call failed"));
                result.insert("message".to_string(), json!(e.to_string()));
                result.extend(context);
                Ok(ToolOutput::new(Value::Object(result)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use meraki_dashboard::ApiCall;
    use std::sync::Mutex;

    struct FakeTransport {
        response: Result<Value, String>,
        calls: Mutex<Vec<ApiCall>>,
    }

    impl FakeTransport {
        fn returning(response: Value) -> Self {
            Self {
                response: Ok(response),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last_call(&self) -> ApiCall {
            self.calls.lock().unwrap().last().cloned().expect("no call")
        }
    }

    #[async_trait]
    impl DashboardTransport for FakeTransport {
        async fn send(&self, call: ApiCall) -> Result<Value> {
            self.calls.lock().unwrap().push(call);
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err(msg) => Err(anyhow::anyhow!("{msg}")),
            }
        }
    }

    fn registered(transport: Arc<FakeTransport>) -> ToolRegistry {
        let tools = ToolRegistry::new();
        let endpoints = EndpointRegistry::new();
        register_common_tools(&tools, &endpoints, transport).unwrap();
        tools
    }

    #[tokio::test]
    async fn every_table_entry_registers() {
        let transport = Arc::new(FakeTransport::returning(json!({})));
        let tools = registered(transport);
        assert_eq!(tools.tool_count(), COMMON_TOOLS.len());
        for spec in COMMON_TOOLS {
            assert!(tools.get_tool(spec.tool_name).is_some(), "{}", spec.tool_name);
        }
    }

    #[tokio::test]
    async fn list_result_is_wrapped_with_count() {
        let transport = Arc::new(FakeTransport::returning(json!([
            {"id": "1", "name": "Org A"},
            {"id": "2", "name": "Org B"}
        ])));
        let tools = registered(Arc::clone(&transport));

        let tool = tools.get_tool("get_organizations").unwrap();
        let out = tool.execute(json!({})).await.unwrap();

        assert_eq!(out.result["method"], json!("getOrganizations"));
        assert_eq!(out.result["count"], json!(2));
        assert_eq!(out.result["organizations"][0]["name"], json!("Org A"));
        assert_eq!(transport.last_call().path, "/organizations");
    }

    #[tokio::test]
    async fn arguments_map_onto_dashboard_parameters() {
        let transport = Arc::new(FakeTransport::returning(json!({"name": "port 7"})));
        let tools = registered(Arc::clone(&transport));

        let tool = tools.get_tool("get_switch_port_config").unwrap();
        let out = tool
            .execute(json!({"serial": "Q2SW-1234", "port_id": "7"}))
            .await
            .unwrap();

        assert_eq!(out.result["method"], json!("getDeviceSwitchPort"));
        assert_eq!(out.result["serial"], json!("Q2SW-1234"));
        assert_eq!(out.result["port_config"]["name"], json!("port 7"));
        assert_eq!(transport.last_call().path, "/devices/Q2SW-1234/switch/ports/7");
    }

    #[tokio::test]
    async fn missing_required_argument_is_reported() {
        let transport = Arc::new(FakeTransport::returning(json!({})));
        let tools = registered(transport);

        let tool = tools.get_tool("get_device_status").unwrap();
        let out = tool.execute(json!({})).await.unwrap();

        assert_eq!(out.result["error"], json!("invalid arguments"));
        assert!(out.result["message"].as_str().unwrap().contains("serial"));
    }

    #[tokio::test]
    async fn upstream_failure_becomes_error_payload() {
        let transport = Arc::new(FakeTransport::failing("429 too many requests"));
        let tools = registered(transport);

        let tool = tools.get_tool("get_network_settings").unwrap();
        let out = tool.execute(json!({"network_id": "N_1"})).await.unwrap();

        assert_eq!(out.result["error"], json!("API call failed"));
        assert!(out.result["message"].as_str().unwrap().contains("429"));
        assert_eq!(out.result["network_id"], json!("N_1"));
    }

    #[tokio::test]
    async fn optional_arguments_pass_through_when_present() {
        let transport = Arc::new(FakeTransport::returning(json!([])));
        let tools = registered(Arc::clone(&transport));

        let tool = tools.get_tool("get_network_clients").unwrap();
        tool.execute(json!({"network_id": "N_1", "timespan": 3600}))
            .await
            .unwrap();

        let call = transport.last_call();
        assert_eq!(call.path, "/networks/N_1/clients");
        assert!(call.query.contains(&("timespan".into(), "3600".into())));
    }
}
