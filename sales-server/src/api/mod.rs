//! API routes
//!
//! Three read-only resources plus the liveness probe:
//!
//! - [`sales`] — `GET /sales`, `GET /sales/{id}`
//! - [`filters`] — `GET /filters/options`
//! - [`health`] — `GET /health`
//!
//! Handlers decode parameters, call the service layer, and serialize the
//! result; no business logic lives here.

pub mod filters;
pub mod health;
pub mod sales;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(sales::router())
        .merge(filters::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
