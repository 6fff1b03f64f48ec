use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use solana_mcp_protocol::{JsonRpcRequest, JsonRpcResponse};

use crate::app_state::AppState;

/// Handle one JSON-RPC request posted to the server.
///
/// A body that is not valid JSON (or is `null`) answers 400 with a parse
/// error. Anything else is dispatched and answers 200, with failures carried
/// in the JSON-RPC envelope.
pub async fn mcp_request(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(req) = parse_request(&body) else {
        tracing::debug!(len = body.len(), "rejecting unparseable request body");
        return (StatusCode::BAD_REQUEST, Json(JsonRpcResponse::parse_error())).into_response();
    };

    let response = state.dispatcher.handle(req).await;
    (StatusCode::OK, Json(response)).into_response()
}

fn parse_request(body: &[u8]) -> Option<JsonRpcRequest> {
    let value: Value = serde_json::from_slice(body).ok()?;
    JsonRpcRequest::from_value(value)
}
