//! # Organization Feed Handlers
//!
//! Read-only passthrough of organization data for the public website.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::adapters::ExternalOperationResult;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

const DEFAULT_EVENT_COUNT: u32 = 5;
const MAX_EVENT_COUNT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub per_page: Option<u32>,
}

impl EventsQuery {
    /// Requested page size; must be within `1..=100`
    pub fn amount(&self) -> ApiResult<u8> {
        let amount = self.per_page.unwrap_or(DEFAULT_EVENT_COUNT);
        if (1..=MAX_EVENT_COUNT).contains(&amount) {
            Ok(amount as u8)
        } else {
            Err(ApiError::bad_request(format!(
                "per_page must be between 1 and {MAX_EVENT_COUNT}"
            )))
        }
    }
}

fn passthrough(result: ExternalOperationResult) -> ApiResult<Json<Value>> {
    match result {
        ExternalOperationResult::Success { payload } => Ok(Json(payload)),
        ExternalOperationResult::Failure {
            error_kind,
            message,
        } => Err(ApiError::upstream(format!(
            "organization API request failed ({error_kind}): {message}"
        ))),
    }
}

/// Latest organization events: GET /github/events
#[instrument(skip(state, query))]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let amount = query.amount()?;
    passthrough(state.directory.recent_events(amount).await)
}

/// Public organization members: GET /github/members
#[instrument(skip(state))]
pub async fn list_members(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    passthrough(state.directory.public_members().await)
}
