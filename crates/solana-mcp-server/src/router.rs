use axum::{
    routing::{get, MethodRouter},
    Router,
};

use crate::app_state::AppState;
use crate::cors::cors_layer;
use crate::handlers;

/// JSON-RPC on POST, server info on GET.
fn mcp_endpoint() -> MethodRouter<AppState> {
    get(handlers::server_info)
        .post(handlers::mcp_request)
        .fallback(handlers::method_not_allowed)
}

fn health_endpoint() -> MethodRouter<AppState> {
    get(handlers::health).fallback(handlers::method_not_allowed)
}

/// Create the main application router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Standalone server layout
        .route("/", mcp_endpoint())
        .route("/health", health_endpoint())
        // Serverless function layout
        .route("/api/mcp", mcp_endpoint())
        .route("/api/mcp/health", health_endpoint())
        .fallback(handlers::fallback)
        .layer(cors_layer(state.allowed_origins.clone()))
        .with_state(state)
}
