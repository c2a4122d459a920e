//! # Organization Invite Workflow
//!
//! Look up a source-hosting account by email, then invite it to the
//! organization.

use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

use crate::adapters::{ExternalOperationResult, OrgDirectory, OrgMember};
use crate::constants::{responses, steps, workflows};
use crate::error::ErrorKind;
use crate::pipeline::{step_fn, Pipeline, PipelineResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgInviteInput {
    pub email: String,
}

/// find member → invite member
pub fn org_invite_pipeline(input: &OrgInviteInput, directory: Arc<dyn OrgDirectory>) -> Pipeline {
    let find_directory = Arc::clone(&directory);
    let email = input.email.clone();

    Pipeline::new(workflows::ORG_INVITE, input.email.clone())
        .step(step_fn(steps::FIND_ORG_MEMBER, move |_| {
            let directory = Arc::clone(&find_directory);
            let email = email.clone();
            async move { directory.find_member_by_email(&email).await }.boxed()
        }))
        .step(step_fn(steps::INVITE_ORG_MEMBER, move |previous: Value| {
            let directory = Arc::clone(&directory);
            async move {
                match serde_json::from_value::<OrgMember>(previous) {
                    Ok(member) => directory.invite_member(&member).await,
                    Err(e) => ExternalOperationResult::failure(
                        ErrorKind::Malformed,
                        format!("previous step did not produce an org member: {e}"),
                    ),
                }
            }
            .boxed()
        }))
}

/// Caller-facing classification of an org invite run
#[derive(Debug, Clone, PartialEq)]
pub enum OrgInviteOutcome {
    Invited(Value),
    UserNotFound,
    Failed,
}

impl OrgInviteOutcome {
    pub fn from_result(result: &PipelineResult) -> Self {
        match (result.failed_step(), result.error_kind()) {
            (None, _) => Self::Invited(result.payload().cloned().unwrap_or(Value::Null)),
            (Some(steps::FIND_ORG_MEMBER), Some(ErrorKind::Rejected))
                if result.reason() == Some("Not Found") =>
            {
                Self::UserNotFound
            }
            _ => Self::Failed,
        }
    }

    pub fn error_body(&self) -> Option<&'static str> {
        match self {
            Self::Invited(_) => None,
            Self::UserNotFound => Some(responses::GITHUB_USER_NOT_FOUND),
            Self::Failed => Some(responses::GITHUB_INVITE_ERROR),
        }
    }
}
