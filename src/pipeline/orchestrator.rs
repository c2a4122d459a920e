//! # Pipeline Orchestrator
//!
//! Executes a [`Pipeline`] strictly in order. The payload of each successful
//! step becomes the input of the next; the first failure stops the run. Steps
//! that already succeeded are never compensated, and the notification sent
//! for a failure lists them so an operator can reconcile by hand.
//!
//! Every run produces exactly one [`PipelineResult`] and exactly one sink
//! notification. Sink failures are the sink's business and never change the
//! result.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::executor::StepExecutor;
use super::notification::NotificationSink;
use super::step::PipelineStep;
use super::types::PipelineResult;
use crate::adapters::ExternalOperationResult;
use crate::logging::log_pipeline_outcome;

/// Ordered steps of one workflow run, fixed at construction
pub struct Pipeline {
    workflow: String,
    subject: String,
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// `subject` identifies the run in notifications, usually an email address
    pub fn new(workflow: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            subject: subject.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("workflow", &self.workflow)
            .field("subject", &self.subject)
            .field("steps", &self.step_names())
            .finish()
    }
}

#[derive(Clone)]
pub struct PipelineOrchestrator {
    executor: StepExecutor,
    sink: Arc<dyn NotificationSink>,
}

impl PipelineOrchestrator {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            executor: StepExecutor::new(),
            sink,
        }
    }

    #[instrument(skip(self, pipeline, input), fields(workflow = %pipeline.workflow))]
    pub async fn run(&self, pipeline: Pipeline, input: Value) -> PipelineResult {
        let correlation_id = Uuid::new_v4();
        let mut completed: Vec<String> = Vec::with_capacity(pipeline.steps.len());
        let mut current = input;

        info!(
            correlation_id = %correlation_id,
            steps = pipeline.steps.len(),
            "Starting pipeline"
        );

        for step in &pipeline.steps {
            match self.executor.run(correlation_id, step.as_ref(), current).await {
                ExternalOperationResult::Success { payload } => {
                    completed.push(step.name().to_string());
                    current = payload;
                }
                ExternalOperationResult::Failure {
                    error_kind,
                    message,
                } => {
                    warn!(
                        correlation_id = %correlation_id,
                        failed_step = %step.name(),
                        error_kind = %error_kind,
                        reason = %message,
                        "Pipeline stopped at failed step"
                    );
                    self.sink
                        .notify(&failure_message(&pipeline, step.name(), &message, &completed))
                        .await;

                    let result = PipelineResult::failed(
                        &pipeline.workflow,
                        correlation_id,
                        completed,
                        step.name(),
                        error_kind,
                        message,
                    );
                    log_pipeline_outcome(
                        correlation_id,
                        result.workflow(),
                        result.outcome().as_str(),
                        result.failed_step(),
                        result.completed_steps().len(),
                    );
                    return result;
                }
            }
        }

        self.sink.notify(&success_message(&pipeline)).await;

        let result =
            PipelineResult::succeeded(&pipeline.workflow, correlation_id, completed, current);
        log_pipeline_outcome(
            correlation_id,
            result.workflow(),
            result.outcome().as_str(),
            None,
            result.completed_steps().len(),
        );
        result
    }
}

/// Subject rendered as a JSON string literal, e.g. `"user@example.com"`
fn quoted(subject: &str) -> String {
    Value::from(subject).to_string()
}

pub fn success_message(pipeline: &Pipeline) -> String {
    format!(
        "{} SUCCESSFUL for: {}",
        pipeline.workflow,
        quoted(&pipeline.subject)
    )
}

pub fn failure_message(
    pipeline: &Pipeline,
    failed_step: &str,
    reason: &str,
    completed: &[String],
) -> String {
    let completed = if completed.is_empty() {
        "none".to_string()
    } else {
        completed.join(", ")
    };
    format!(
        "{} FAILED at step {} for: {}. Reason: {}. Completed steps: {}",
        pipeline.workflow,
        failed_step,
        quoted(&pipeline.subject),
        reason,
        completed
    )
}
