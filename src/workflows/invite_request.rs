//! Chat workspace invitation requests. A single chat post, no pipeline.

use tracing::instrument;

use crate::adapters::{ChatNotifier, ExternalOperationResult};

pub fn invitation_message(email: &str) -> String {
    format!("Invitation request for: {email}")
}

/// Ask the operators, via the chat channel, to invite `email`
#[instrument(skip(notifier))]
pub async fn request_invitation(notifier: &dyn ChatNotifier, email: &str) -> ExternalOperationResult {
    notifier.post_message(&invitation_message(email)).await
}
