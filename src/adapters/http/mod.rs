//! HTTP adapters - REST API implementations.

pub mod qa;

pub use qa::{qa_router, QaAppState};

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Complete application router: banner at `/`, everything else under `/api`.
pub fn app_router(state: QaAppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(qa::handlers::banner))
        .nest("/api", qa_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.cors_origins_list()))
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs))),
        )
}

/// Any origin when none are configured or `*` is listed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
