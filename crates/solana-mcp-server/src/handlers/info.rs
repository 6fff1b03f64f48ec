use axum::{
    extract::{MatchedPath, State},
    Json,
};
use serde_json::Value;

use crate::app_state::AppState;

const DISPLAY_NAME: &str = "Solana MCP Server";

/// Server metadata and the endpoint map for the mount point that was hit.
pub async fn server_info(State(state): State<AppState>, path: MatchedPath) -> Json<Value> {
    let base = path.as_str().trim_end_matches('/');
    let mcp = if base.is_empty() { "/" } else { base };
    let info = state.dispatcher.info();

    Json(serde_json::json!({
        "name": DISPLAY_NAME,
        "version": info.version,
        "description": info.description,
        "endpoints": {
            "health": format!("{base}/health"),
            "mcp": format!("POST {mcp} (JSON-RPC)"),
        },
        "network": state.network.network,
        "rpcUrl": state.network.rpc_url,
    }))
}
