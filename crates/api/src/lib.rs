//! HTTP API layer for ballot.
//!
//! - **Endpoints**: participants, voting, messages and admin results
//! - **Middleware**: shared application state, tracing and CORS
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod middleware;

use axum::{Router, http::HeaderValue};
use ballot_common::CorsConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub use endpoints::router;
pub use middleware::{AppState, CatalogState};

/// Build the full application: health routes, the `/api` tree and the HTTP layers.
pub fn app(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(endpoints::health::router())
        .nest("/api", router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

/// CORS layer allowing the configured origins, or any origin when none are set.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
