//! Thread-safe tool registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{bail, Result};

use crate::definition::{validate_input_schema, validate_tool_name, ToolDefinition, ToolInfo};

/// A thread-safe registry of tool definitions.
///
/// Tools are stored as `Arc<dyn ToolDefinition>` so callers can share
/// references without holding the lock during execution.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn ToolDefinition>>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a tool. Rejects duplicate names, invalid names, and invalid
    /// input schemas.
    pub fn register(&self, tool: Box<dyn ToolDefinition>) -> Result<()> {
        let name = tool.name().to_string();
        validate_tool_name(&name)?;
        validate_input_schema(&tool.input_schema())?;

        let mut map = self
            .tools
            .write()
            .map_err(|e| anyhow::anyhow!("registry lock poisoned: {e}"))?;

        if map.contains_key(&name) {
            bail!("tool already registered: {name}");
        }

        map.insert(name, Arc::from(tool));
        Ok(())
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn ToolDefinition>> {
        let map = self.tools.read().ok()?;
        map.get(name).cloned()
    }

    /// All registered tools, sorted by name for deterministic listings.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        let map = self.tools.read().expect("registry lock poisoned");
        let mut infos: Vec<ToolInfo> = map
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    pub fn tool_count(&self) -> usize {
        self.tools.read().expect("registry lock poisoned").len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ToolOutput;
    use serde_json::json;

    struct StaticTool {
        name: String,
    }

    impl StaticTool {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
            }
        }
    }

    #[async_trait::async_trait]
    impl ToolDefinition for StaticTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "static test tool"
        }

        fn input_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, _input: serde_json::Value) -> anyhow::Result<ToolOutput> {
            Ok(ToolOutput::new(json!({"tool": self.name})))
        }
    }

    #[test]
    fn register_and_list_sorted() {
        let registry = ToolRegistry::new();
        registry.register(Box::new(StaticTool::new("beta"))).unwrap();
        registry.register(Box::new(StaticTool::new("alpha"))).unwrap();

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "alpha");
        assert_eq!(tools[1].name, "beta");
    }

    #[test]
    fn duplicate_names_rejected() {
        let registry = ToolRegistry::new();
        registry.register(Box::new(StaticTool::new("dup"))).unwrap();
        let err = registry.register(Box::new(StaticTool::new("dup"))).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn invalid_names_rejected() {
        let registry = ToolRegistry::new();
        for name in ["bad-name", "bad name", "", "../up"] {
            assert!(
                registry.register(Box::new(StaticTool::new(name))).is_err(),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn lookup_by_name() {
        let registry = ToolRegistry::new();
        registry.register(Box::new(StaticTool::new("lookup"))).unwrap();
        assert!(registry.get_tool("lookup").is_some());
        assert!(registry.get_tool("missing").is_none());
        assert_eq!(registry.tool_count(), 1);
    }
}
