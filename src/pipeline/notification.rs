//! # Notification Sinks
//!
//! Operator-facing audit trail of pipeline outcomes. Delivery is best effort:
//! a sink logs its own failures and never reports them back to the caller.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::{ChatNotifier, ExternalOperationResult};

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Mirrors every message to the log, then posts it to the chat channel
pub struct ChatNotificationSink {
    notifier: Arc<dyn ChatNotifier>,
}

impl ChatNotificationSink {
    pub fn new(notifier: Arc<dyn ChatNotifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl NotificationSink for ChatNotificationSink {
    async fn notify(&self, message: &str) {
        info!(notification = %message, "Operator notification");

        if let ExternalOperationResult::Failure {
            error_kind,
            message: reason,
        } = self.notifier.post_message(message).await
        {
            warn!(
                error_kind = %error_kind,
                reason = %reason,
                "Failed to deliver operator notification"
            );
        }
    }
}

/// Log-only sink for deployments without chat notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, message: &str) {
        info!(notification = %message, "Operator notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::Mutex;

    struct RecordingNotifier {
        posted: Mutex<Vec<String>>,
        result: ExternalOperationResult,
    }

    #[async_trait]
    impl ChatNotifier for RecordingNotifier {
        async fn post_message(&self, text: &str) -> ExternalOperationResult {
            self.posted.lock().unwrap().push(text.to_string());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_chat_sink_swallows_delivery_failure() {
        let notifier = Arc::new(RecordingNotifier {
            posted: Mutex::new(Vec::new()),
            result: ExternalOperationResult::failure(ErrorKind::Rejected, "invalid_auth"),
        });
        let sink = ChatNotificationSink::new(notifier.clone());

        sink.notify("Membership SUCCESSFUL for: \"a@b.fi\"").await;

        assert_eq!(
            notifier.posted.lock().unwrap().as_slice(),
            ["Membership SUCCESSFUL for: \"a@b.fi\"".to_string()]
        );
    }
}
