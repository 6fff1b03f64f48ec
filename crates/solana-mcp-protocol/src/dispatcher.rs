use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::error::{DispatchError, RegistryError};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::tools::{Tool, ToolDefinition, ToolRegistry};

/// Protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Identity reported in the `initialize` handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Parameters of a `tools/call` request.
#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Result of a successful `tools/call`.
#[derive(Debug, Serialize)]
struct CallToolResult {
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Content {
    Text { text: String },
}

/// Routes JSON-RPC requests to protocol handlers and registered tools.
///
/// `handle` is total: every request, including unknown methods and failing
/// tools, produces a well-formed response carrying the request's id.
pub struct Dispatcher {
    info: ServerInfo,
    registry: RwLock<ToolRegistry>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(info: ServerInfo, registry: ToolRegistry) -> Self {
        Self {
            info,
            registry: RwLock::new(registry),
        }
    }

    #[must_use]
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Register a tool after construction.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyName`] if the tool's name is empty.
    pub async fn register(&self, tool: Arc<dyn Tool>) -> Result<bool, RegistryError> {
        self.registry.write().await.register(tool)
    }

    /// Definitions of all registered tools, in registration order.
    pub async fn tools(&self) -> Vec<ToolDefinition> {
        self.registry.read().await.list()
    }

    /// Handle a single request.
    pub async fn handle(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest {
            id, method, params, ..
        } = req;

        tracing::debug!(%method, ?id, "dispatching request");

        match self.route(&method, params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                tracing::warn!(%method, ?id, error = %err, "request failed");
                JsonRpcResponse::error(id, err.code(), err.to_string())
            }
        }
    }

    async fn route(&self, method: &str, params: Option<Value>) -> Result<Value, DispatchError> {
        match method {
            "initialize" => Ok(self.initialize()),
            "tools/list" => {
                let tools = self.tools().await;
                Ok(json!({ "tools": tools }))
            }
            "tools/call" => self.call_tool(params).await,
            other => Err(DispatchError::MethodNotSupported(other.to_string())),
        }
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": self.info,
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, DispatchError> {
        let params = params.ok_or_else(|| DispatchError::InvalidParams("missing params".into()))?;
        let CallParams { name, arguments } = serde_json::from_value(params)
            .map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        // Clone the handle out so the lock is not held across the call.
        let tool = self
            .registry
            .read()
            .await
            .lookup(&name)
            .ok_or_else(|| DispatchError::ToolNotFound(name.clone()))?;

        let arguments = if arguments.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            arguments
        };

        let output = tool.call(arguments).await?;
        tracing::debug!(tool = %name, "tool call succeeded");

        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| DispatchError::Serialization(e.to_string()))?;
        serde_json::to_value(CallToolResult {
            content: vec![Content::Text { text }],
        })
        .map_err(|e| DispatchError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::jsonrpc::INTERNAL_ERROR;
    use crate::tools::FnTool;

    fn info() -> ServerInfo {
        ServerInfo {
            name: "test-server".into(),
            version: "9.9.9".into(),
            description: "under test".into(),
        }
    }

    fn dispatcher() -> Dispatcher {
        let registry = ToolRegistry::new()
            .with(FnTool::new(
                ToolDefinition::new("echo", "Echo arguments", json!({"type": "object"})),
                Ok,
            ))
            .unwrap()
            .with(FnTool::new(
                ToolDefinition::new("fail", "Always fails", json!({"type": "object"})),
                |_| Err(ToolError::Execution("Failed to do it: upstream down".into())),
            ))
            .unwrap();
        Dispatcher::new(info(), registry)
    }

    async fn call(d: &Dispatcher, method: &str, params: Option<Value>) -> Value {
        let resp = d.handle(JsonRpcRequest::new(7, method, params)).await;
        serde_json::to_value(resp).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_identity_regardless_of_params() {
        let d = dispatcher();
        for params in [None, Some(json!({})), Some(json!({"junk": [1, 2, 3]}))] {
            let resp = call(&d, "initialize", params).await;
            assert_eq!(resp["id"], 7);
            assert_eq!(resp["result"]["protocolVersion"], PROTOCOL_VERSION);
            assert_eq!(resp["result"]["capabilities"], json!({"tools": {}}));
            assert_eq!(resp["result"]["serverInfo"]["name"], "test-server");
            assert_eq!(resp["result"]["serverInfo"]["version"], "9.9.9");
            assert_eq!(resp["result"]["serverInfo"]["description"], "under test");
        }
    }

    #[tokio::test]
    async fn tools_list_is_ordered_and_stable() {
        let d = dispatcher();
        let first = call(&d, "tools/list", None).await;
        let second = call(&d, "tools/list", Some(json!({"cursor": "x"}))).await;

        let tools = first["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["description"], "Echo arguments");
        assert_eq!(tools[0]["inputSchema"], json!({"type": "object"}));
        assert_eq!(tools[1]["name"], "fail");

        assert_eq!(
            serde_json::to_string(&first["result"]["tools"]).unwrap(),
            serde_json::to_string(&second["result"]["tools"]).unwrap()
        );
    }

    #[tokio::test]
    async fn tools_call_wraps_result_as_text() {
        let d = dispatcher();
        let args = json!({"address": "abc", "nested": {"n": 1}});
        let resp = call(
            &d,
            "tools/call",
            Some(json!({"name": "echo", "arguments": args})),
        )
        .await;

        let content = resp["result"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        let text = content[0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, args);
    }

    #[tokio::test]
    async fn missing_arguments_become_empty_object() {
        let d = dispatcher();
        let resp = call(&d, "tools/call", Some(json!({"name": "echo"}))).await;
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn unknown_tool_is_lookup_fault() {
        let d = dispatcher();
        let resp = call(
            &d,
            "tools/call",
            Some(json!({"name": "get_everything", "arguments": {}})),
        )
        .await;
        assert_eq!(resp["id"], 7);
        assert_eq!(resp["error"]["code"], INTERNAL_ERROR);
        assert_eq!(resp["error"]["message"], "Tool 'get_everything' not found");
        assert!(resp.get("result").is_none());
    }

    #[tokio::test]
    async fn handler_fault_message_is_preserved() {
        let d = dispatcher();
        let resp = call(&d, "tools/call", Some(json!({"name": "fail", "arguments": {}}))).await;
        assert_eq!(resp["error"]["code"], INTERNAL_ERROR);
        assert_eq!(resp["error"]["message"], "Failed to do it: upstream down");
    }

    #[tokio::test]
    async fn tools_call_without_params_is_error() {
        let d = dispatcher();
        let resp = call(&d, "tools/call", None).await;
        assert_eq!(resp["error"]["code"], INTERNAL_ERROR);
        assert!(resp["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid params"));
    }

    #[tokio::test]
    async fn unsupported_method() {
        let d = dispatcher();
        for method in ["resources/list", "ping", ""] {
            let resp = call(&d, method, None).await;
            assert_eq!(resp["error"]["code"], INTERNAL_ERROR);
            assert_eq!(
                resp["error"]["message"],
                format!("Method '{method}' not supported")
            );
        }
    }

    #[tokio::test]
    async fn id_is_echoed_for_every_shape() {
        let d = dispatcher();
        for id in [json!(1), json!("req-1"), Value::Null] {
            let ok = d
                .handle(JsonRpcRequest::new(id.clone(), "tools/list", None))
                .await;
            let err = d
                .handle(JsonRpcRequest::new(id.clone(), "bogus", None))
                .await;
            assert_eq!(ok.id, Some(id.clone()));
            assert_eq!(err.id, Some(id));
        }
    }

    #[tokio::test]
    async fn absent_id_stays_absent() {
        let d = dispatcher();
        let req = JsonRpcRequest {
            id: None,
            ..JsonRpcRequest::new(0, "tools/list", None)
        };
        let resp = d.handle(req).await;
        assert!(resp.id.is_none());
        let json = serde_json::to_value(&resp).unwrap();
        assert!(!json.as_object().unwrap().contains_key("id"));
    }

    #[tokio::test]
    async fn runtime_registration_appends_to_listing() {
        let d = dispatcher();
        d.register(Arc::new(FnTool::new(
            ToolDefinition::new("late", "Added later", json!({})),
            |_| Ok(json!({"late": true})),
        )))
        .await
        .unwrap();

        let names: Vec<String> = d.tools().await.into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["echo", "fail", "late"]);

        let resp = call(&d, "tools/call", Some(json!({"name": "late"}))).await;
        assert!(resp.get("error").is_none());
    }
}
