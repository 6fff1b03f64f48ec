use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Hosting platforms whose deployments are allowed regardless of the list.
pub const HOSTED_DOMAINS: [&str; 2] = ["netlify.app", "vercel.app"];

/// How long browsers may cache a preflight response.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Whether a browser origin may call this server.
#[must_use]
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|o| o == origin) || HOSTED_DOMAINS.iter().any(|d| origin.contains(d))
}

/// CORS policy that reflects the request's `Origin` when it is allowed.
///
/// Every `OPTIONS` request is answered directly by the layer.
pub fn cors_layer(allowed: Arc<Vec<String>>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| origin_allowed(origin, &allowed))
            },
        ))
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE)
}
