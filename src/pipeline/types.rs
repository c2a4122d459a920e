//! # Pipeline Types
//!
//! Terminal outcome of a pipeline run. A [`PipelineResult`] is built exactly
//! once, by the orchestrator, and is read-only afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success,
    Failure,
}

impl PipelineOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineOutcome::Success => "success",
            PipelineOutcome::Failure => "failure",
        }
    }
}

/// Result of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    workflow: String,
    correlation_id: Uuid,
    outcome: PipelineOutcome,
    failed_step: Option<String>,
    error_kind: Option<ErrorKind>,
    reason: Option<String>,
    completed_steps: Vec<String>,
    payload: Option<Value>,
}

impl PipelineResult {
    pub(crate) fn succeeded(
        workflow: &str,
        correlation_id: Uuid,
        completed_steps: Vec<String>,
        payload: Value,
    ) -> Self {
        Self {
            workflow: workflow.to_string(),
            correlation_id,
            outcome: PipelineOutcome::Success,
            failed_step: None,
            error_kind: None,
            reason: None,
            completed_steps,
            payload: Some(payload),
        }
    }

    pub(crate) fn failed(
        workflow: &str,
        correlation_id: Uuid,
        completed_steps: Vec<String>,
        failed_step: &str,
        error_kind: ErrorKind,
        reason: String,
    ) -> Self {
        Self {
            workflow: workflow.to_string(),
            correlation_id,
            outcome: PipelineOutcome::Failure,
            failed_step: Some(failed_step.to_string()),
            error_kind: Some(error_kind),
            reason: Some(reason),
            completed_steps,
            payload: None,
        }
    }

    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn outcome(&self) -> PipelineOutcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome == PipelineOutcome::Success
    }

    /// Name of the step that failed; `None` on success
    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Steps that succeeded, in execution order
    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    /// Payload of the last step; `None` on failure
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}
