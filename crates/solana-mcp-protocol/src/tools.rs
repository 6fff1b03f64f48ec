use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, ToolError};

/// Definition of a tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A named, schema-described operation callable through `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema of this tool.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with the caller-supplied arguments.
    async fn call(&self, arguments: Value) -> Result<Value, ToolError>;
}

type Handler = dyn Fn(Value) -> Result<Value, ToolError> + Send + Sync;

/// A tool backed by a plain closure.
pub struct FnTool {
    definition: ToolDefinition,
    handler: Box<Handler>,
}

impl FnTool {
    pub fn new<F>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self {
            definition,
            handler: Box::new(handler),
        }
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        (self.handler)(arguments)
    }
}

struct Entry {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

/// Registry of tools, listed in the order they were first registered.
///
/// A tool's definition is captured once at registration. Registering a name
/// again replaces the tool but keeps its original position.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<Entry>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any existing tool with the same name.
    ///
    /// Returns `true` if an existing tool was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyName`] if the tool's name is empty.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<bool, RegistryError> {
        let definition = tool.definition();
        if definition.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.definition.name == definition.name)
        {
            tracing::warn!(tool = %definition.name, "replacing previously registered tool");
            *entry = Entry { definition, tool };
            return Ok(true);
        }

        tracing::debug!(tool = %definition.name, "registered tool");
        self.entries.push(Entry { definition, tool });
        Ok(false)
    }

    /// Builder-style variant of [`ToolRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyName`] if the tool's name is empty.
    pub fn with(mut self, tool: impl Tool + 'static) -> Result<Self, RegistryError> {
        self.register(Arc::new(tool))?;
        Ok(self)
    }

    /// Definitions of all tools, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(|e| e.definition.clone()).collect()
    }

    /// Find a tool by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.entries
            .iter()
            .find(|e| e.definition.name == name)
            .map(|e| Arc::clone(&e.tool))
    }

    /// Names of all tools, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.definition.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(name: &str, description: &str) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(
            ToolDefinition::new(name, description, serde_json::json!({"type": "object"})),
            Ok,
        ))
    }

    #[test]
    fn lists_in_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(echo(name, "d")).unwrap();
        }

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn reregistration_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        assert!(!registry.register(echo("a", "first")).unwrap());
        registry.register(echo("b", "b")).unwrap();
        assert!(registry.register(echo("a", "second")).unwrap());

        let tools = registry.list();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "a");
        assert_eq!(tools[0].description, "second");
    }

    #[test]
    fn empty_name_rejected() {
        let mut registry = ToolRegistry::new();
        assert_eq!(registry.register(echo("", "d")), Err(RegistryError::EmptyName));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn lookup_returns_callable_tool() {
        let registry = ToolRegistry::new().with(FnTool::new(
            ToolDefinition::new("double", "d", serde_json::json!({})),
            |args| {
                let n = args["n"]
                    .as_i64()
                    .ok_or_else(|| ToolError::MissingArgument("n".into()))?;
                Ok(serde_json::json!({ "n": n * 2 }))
            },
        ))
        .unwrap();

        let tool = registry.lookup("double").unwrap();
        let out = tool.call(serde_json::json!({"n": 21})).await.unwrap();
        assert_eq!(out["n"], 42);
        assert!(registry.lookup("triple").is_none());
    }

    #[test]
    fn definition_serializes_input_schema_key() {
        let def = ToolDefinition::new("get_slot", "slot", serde_json::json!({"type": "object"}));
        let json = serde_json::to_value(&def).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }
}
