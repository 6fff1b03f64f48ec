use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;

use super::mcp::mcp_request;

/// Paths without a route: POST still speaks JSON-RPC, GET is 404 and any
/// other verb (HEAD included) is 405.
pub async fn fallback(state: State<AppState>, method: Method, body: Bytes) -> Response {
    match method {
        Method::POST => mcp_request(state, body).await,
        Method::GET => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
        }
        _ => method_not_allowed().await.into_response(),
    }
}

/// Known path, unsupported verb.
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
