//! # Invitation Handlers
//!
//! - `POST /invites`: ask the operators, through the chat channel, to invite
//!   an email address to the chat workspace.
//! - `POST /invites/github`: find the account registered with an email and
//!   invite it to the source-hosting organization.
//!
//! Both reject a malformed email with 400 `Invalid email` before any outbound
//! call is made.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::adapters::ExternalOperationResult;
use crate::constants::responses;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;
use crate::workflows::{org_invite_pipeline, request_invitation, OrgInviteInput, OrgInviteOutcome};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteRequest {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
}

/// A body without a usable email is treated the same as a malformed address
fn validated_email(payload: Result<Json<InviteRequest>, JsonRejection>) -> ApiResult<String> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request(responses::INVALID_EMAIL))?;
    request
        .validate()
        .map_err(|_| ApiError::bad_request(responses::INVALID_EMAIL))?;
    Ok(request.email)
}

/// Request a chat invitation: POST /invites
#[instrument(skip(state, payload))]
pub async fn create_invite(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InviteRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let email = validated_email(payload)?;
    info!(email = %email, "Requesting chat invitation");

    let chat = Arc::clone(&state.chat);
    let result =
        tokio::spawn(async move { request_invitation(chat.as_ref(), &email).await }).await?;

    match result {
        ExternalOperationResult::Success { .. } => Ok(StatusCode::OK),
        ExternalOperationResult::Failure { message, .. } => Err(ApiError::internal(format!(
            "Creating chat invitation failed: {message}"
        ))),
    }
}

/// Invite to the source-hosting organization: POST /invites/github
#[instrument(skip(state, payload))]
pub async fn create_github_invite(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InviteRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let input = OrgInviteInput {
        email: validated_email(payload)?,
    };
    info!(email = %input.email, "Starting organization invite");

    let pipeline = org_invite_pipeline(&input, Arc::clone(&state.directory));
    let orchestrator = state.orchestrator.clone();
    let result =
        tokio::spawn(async move { orchestrator.run(pipeline, Value::Null).await }).await?;

    match OrgInviteOutcome::from_result(&result) {
        OrgInviteOutcome::Invited(payload) => Ok(Json(payload)),
        OrgInviteOutcome::UserNotFound => Err(ApiError::not_found(responses::GITHUB_USER_NOT_FOUND)),
        OrgInviteOutcome::Failed => Err(ApiError::workflow(
            StatusCode::INTERNAL_SERVER_ERROR,
            responses::GITHUB_INVITE_ERROR,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_syntax_is_checked() {
        let ok = InviteRequest {
            email: "new@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in ["not-an-email", "", "a@"] {
            let request = InviteRequest {
                email: bad.to_string(),
            };
            assert!(request.validate().is_err(), "{bad} should be rejected");
        }
    }
}
