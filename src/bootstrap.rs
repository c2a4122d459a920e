//! # Gateway Bootstrap
//!
//! Builds every long-lived component from a loaded [`ConfigManager`]: one HTTP
//! transport per remote service, the adapters on top of them, the
//! notification sink and the web application state.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::adapters::google_auth::ServiceAccountAuthenticator;
use crate::adapters::http::HttpTransport;
use crate::adapters::{
    ChatNotifier, GithubOrgDirectory, GoogleSheetsLedger, SlackNotifier, StripePaymentGateway,
};
use crate::config::ConfigManager;
use crate::error::Result;
use crate::pipeline::{ChatNotificationSink, LogNotificationSink, NotificationSink};
use crate::web::AppState;
use crate::workflows::MembershipServices;

pub struct GatewayBootstrap;

impl GatewayBootstrap {
    /// Wire adapters and build the shared web state
    pub fn build_state(manager: &ConfigManager) -> Result<Arc<AppState>> {
        let config = manager.config();
        let http = &config.http;

        let payments = Arc::new(StripePaymentGateway::new(
            &config.stripe,
            HttpTransport::new("stripe", http)?,
        ));

        let authenticator = Arc::new(ServiceAccountAuthenticator::from_config(
            &config.google,
            HttpTransport::new("google-oauth", http)?,
        )?);
        let ledger = Arc::new(GoogleSheetsLedger::new(
            &config.google,
            HttpTransport::new("google-sheets", http)?,
            authenticator,
        )?);

        let chat: Arc<dyn ChatNotifier> = Arc::new(SlackNotifier::new(
            &config.slack,
            HttpTransport::new("slack", http)?,
        ));

        let directory = Arc::new(GithubOrgDirectory::new(
            &config.github,
            HttpTransport::new("github", http)?,
        ));

        let sink: Arc<dyn NotificationSink> = if config.slack.notifications_enabled {
            Arc::new(ChatNotificationSink::new(Arc::clone(&chat)))
        } else {
            Arc::new(LogNotificationSink)
        };

        info!(
            environment = %manager.environment(),
            plan_id = %config.stripe.plan_id,
            organization = %config.github.organization,
            chat_notifications = config.slack.notifications_enabled,
            "Gateway components initialized"
        );

        Ok(Arc::new(AppState::new(
            MembershipServices {
                payments,
                ledger,
                plan_id: config.stripe.plan_id.clone(),
                added_by: config.google.added_by.clone(),
            },
            chat,
            directory,
            sink,
            manager.environment(),
        )))
    }

    /// Bind the listener for the configured address
    pub async fn bind_listener(manager: &ConfigManager) -> Result<TcpListener> {
        let address = &manager.config().server.bind_address;
        let listener = TcpListener::bind(address).await?;
        info!(address = %address, "Gateway listener bound");
        Ok(listener)
    }
}
