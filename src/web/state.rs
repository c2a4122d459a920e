//! # Web Application State
//!
//! Read-only services shared by every request. Built once by the bootstrap
//! and handed to the router behind an `Arc`.

use std::sync::Arc;

use crate::adapters::{ChatNotifier, OrgDirectory};
use crate::pipeline::{NotificationSink, PipelineOrchestrator};
use crate::workflows::MembershipServices;

#[derive(Clone)]
pub struct AppState {
    pub membership: MembershipServices,
    pub chat: Arc<dyn ChatNotifier>,
    pub directory: Arc<dyn OrgDirectory>,
    pub orchestrator: PipelineOrchestrator,
    pub environment: String,
}

impl AppState {
    pub fn new(
        membership: MembershipServices,
        chat: Arc<dyn ChatNotifier>,
        directory: Arc<dyn OrgDirectory>,
        sink: Arc<dyn NotificationSink>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            membership,
            chat,
            directory,
            orchestrator: PipelineOrchestrator::new(sink),
            environment: environment.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("plan_id", &self.membership.plan_id)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
