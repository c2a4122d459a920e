//! # Web API
//!
//! axum application for the membership gateway.
//!
//! | Route | Purpose |
//! |---|---|
//! | `POST /membership` | paid member sign-up |
//! | `POST /invites` | chat workspace invitation request |
//! | `POST /invites/github` | organization invite by email |
//! | `GET /github/events` | latest organization events |
//! | `GET /github/members` | public organization members |
//! | `GET /health` | liveness |
//!
//! `request_timeout` applies to every route except the two workflow routes,
//! which always answer with the workflow's terminal outcome.

use axum::http::StatusCode;
use axum::Router;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::{ApiError, ApiResult};
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Workflow routes are exempt from the request timeout; adapter timeouts
    // bound each of their steps.
    let timed_routes = Router::new()
        .merge(routes::health_routes())
        .merge(routes::invite_routes())
        .merge(routes::github_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    let app = Router::new()
        .merge(routes::workflow_routes())
        .merge(timed_routes)
        .layer(common_middleware)
        .with_state(state);

    info!(
        request_timeout_ms = request_timeout.as_millis() as u64,
        "Web application created with all routes and middleware"
    );
    app
}
