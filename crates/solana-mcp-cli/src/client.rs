use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde_json::Value;

use solana_mcp_protocol::{JsonRpcRequest, JsonRpcResponse};

/// Minimal JSON-RPC client for a running MCP server.
pub struct McpClient {
    url: String,
    http: Client,
    next_id: AtomicU64,
}

impl McpClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Send one request and return the `result`, or fail with the server's error.
    pub async fn request(&self, method: &str, params: Option<Value>) -> anyhow::Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);
        tracing::debug!(method, id, url = %self.url, "sending request");

        let resp = self.http.post(&self.url).json(&req).send().await?;
        let status = resp.status();
        let body: JsonRpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            anyhow::bail!("{} (code {}, HTTP {status})", err.message, err.code);
        }
        body.result
            .ok_or_else(|| anyhow::anyhow!("response carried neither result nor error"))
    }

    /// Call a tool and decode the JSON payload inside its text content.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> anyhow::Result<Value> {
        let result = self
            .request(
                "tools/call",
                Some(serde_json::json!({ "name": name, "arguments": arguments })),
            )
            .await?;

        let text = result["content"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("tool result has no text content"))?;
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn returns_result_on_success() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("\"method\":\"initialize\"");
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "serverInfo": { "name": "solana-mcp-server" } }
                }));
            })
            .await;

        let client = McpClient::new(server.url("/"));
        let result = client.request("initialize", Some(json!({}))).await.unwrap();
        m.assert_async().await;
        assert_eq!(result["serverInfo"]["name"], "solana-mcp-server");
    }

    #[tokio::test]
    async fn surfaces_envelope_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32603, "message": "Tool 'x' not found" }
                }));
            })
            .await;

        let client = McpClient::new(server.url("/"));
        let err = client.call_tool("x", json!({})).await.unwrap_err();
        assert!(err.to_string().starts_with("Tool 'x' not found"));
    }

    #[tokio::test]
    async fn decodes_tool_text_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).body_contains("get_slot");
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "content": [{ "type": "text", "text": "{\n  \"slot\": 42\n}" }] }
                }));
            })
            .await;

        let client = McpClient::new(server.url("/"));
        let payload = client.call_tool("get_slot", json!({})).await.unwrap();
        assert_eq!(payload["slot"], 42);
    }
}
