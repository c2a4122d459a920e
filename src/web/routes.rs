//! # Web API Routes
//!
//! Route definitions grouped by functionality.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::{handlers, state::AppState};

/// Liveness check for load balancers
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Multi-step workflows. Each step is bounded by its adapter's HTTP timeout,
/// so these routes always answer with the workflow's terminal outcome.
pub fn workflow_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/membership", post(handlers::membership::create_membership))
        .route(
            "/invites/github",
            post(handlers::invites::create_github_invite),
        )
}

/// Chat invitation request
pub fn invite_routes() -> Router<Arc<AppState>> {
    Router::new().route("/invites", post(handlers::invites::create_invite))
}

/// Read-only organization feeds
pub fn github_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/github/events", get(handlers::github::list_events))
        .route("/github/members", get(handlers::github::list_members))
}
