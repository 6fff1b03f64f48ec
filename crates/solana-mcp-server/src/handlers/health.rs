use axum::{extract::State, Json};
use serde_json::Value;

use crate::app_state::AppState;
use crate::tools::timestamp;

/// Health check endpoint.
///
/// Reports liveness only; the ledger node is never contacted.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": timestamp(),
        "network": state.network.network,
        "rpcUrl": state.network.rpc_url,
    }))
}
