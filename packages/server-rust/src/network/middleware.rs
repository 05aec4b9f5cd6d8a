//! Request-id, tracing, CORS and timeout layers wrapped around the schema
//! routes.

use std::time::Duration;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;

const REQUEST_ID: &str = "x-request-id";

/// Wraps `router` in the HTTP middleware of the schema server.
///
/// The first layer is the outermost one:
/// 1. a UUID `x-request-id` is assigned unless the client sent one
/// 2. each request gets a trace span
/// 3. CORS, since the rendering client usually lives on another origin
/// 4. requests slower than the configured timeout get 408
/// 5. the request id is copied onto the response
pub fn apply_http_layers<S>(router: Router<S>, config: &ServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id = HeaderName::from_static(REQUEST_ID);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors_origins, request_id.clone()))
            .layer(timeout_layer(config.request_timeout()))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}

fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Schema reads are `GET`; display rows are `POST`ed as JSON.
fn cors_layer(origins: &[String], request_id: HeaderName) -> CorsLayer {
    let allow_origin = match allowed_origins(origins) {
        Some(list) => AllowOrigin::list(list),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([request_id])
}

/// `None` when `*` is configured. Entries that are not valid header values
/// are logged and left out.
fn allowed_origins(origins: &[String]) -> Option<Vec<HeaderValue>> {
    if origins.iter().any(|o| o == "*") {
        return None;
    }
    let list = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin.escape_debug(), "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    Some(list)
}
