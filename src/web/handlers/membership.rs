//! # Membership Handler
//!
//! `POST /membership`: validate the sign-up form, run the membership
//! pipeline and answer with one of `payment_success`, `payment_error` or
//! `membership_storage_error`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;
use crate::workflows::{membership_pipeline, MembershipInput, MembershipOutcome};

/// Member details as posted by the sign-up form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInfo {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 255))]
    pub address: String,

    #[validate(length(min = 1, max = 20))]
    pub postcode: String,

    #[validate(length(min = 1, max = 255))]
    pub city: String,

    #[validate(length(min = 1, max = 255))]
    pub handle: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    #[validate(nested)]
    pub user_info: UserInfo,

    /// Single-use card token from the checkout form
    #[validate(length(min = 1))]
    pub stripe_token: String,
}

impl MembershipRequest {
    pub fn into_input(self) -> MembershipInput {
        let UserInfo {
            name,
            email,
            address,
            postcode,
            city,
            handle,
        } = self.user_info;
        MembershipInput {
            name,
            email,
            address,
            postcode,
            city,
            handle,
            payment_token: self.stripe_token,
        }
    }
}

/// Add a new member: POST /membership
#[instrument(skip(state, payload))]
pub async fn create_membership(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MembershipRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, &'static str)> {
    let Json(request) = payload?;
    request.validate()?;
    let input = request.into_input();

    info!(email = %input.email, "Starting membership sign-up");

    let pipeline = membership_pipeline(&input, &state.membership, Local::now().date_naive());
    let initial = serde_json::to_value(&input)
        .map_err(|e| ApiError::internal(format!("failed to encode membership input: {e}")))?;
    let orchestrator = state.orchestrator.clone();

    // Runs to completion even if the client disconnects
    let result = tokio::spawn(async move { orchestrator.run(pipeline, initial).await }).await?;

    let outcome = MembershipOutcome::from_result(&result);
    if outcome.is_success() {
        Ok((StatusCode::OK, outcome.response_body()))
    } else {
        Err(ApiError::workflow(
            StatusCode::INTERNAL_SERVER_ERROR,
            outcome.response_body(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_json() -> serde_json::Value {
        json!({
            "userInfo": {
                "name": "Aino Virtanen",
                "email": "aino@example.com",
                "address": "Mannerheimintie 1",
                "postcode": "00100",
                "city": "Helsinki",
                "handle": "aino"
            },
            "stripeToken": "tok_visa"
        })
    }

    #[test]
    fn test_valid_request_converts_to_input() {
        let request: MembershipRequest = serde_json::from_value(request_json()).unwrap();
        assert!(request.validate().is_ok());

        let input = request.into_input();
        assert_eq!(input.payment_token, "tok_visa");
        assert_eq!(input.handle, "aino");
    }

    #[test]
    fn test_nested_email_is_validated() {
        let mut body = request_json();
        body["userInfo"]["email"] = json!("not-an-email");
        let request: MembershipRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let mut body = request_json();
        body["stripeToken"] = json!("");
        let request: MembershipRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }
}
