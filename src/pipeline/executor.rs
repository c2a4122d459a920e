//! # Step Executor
//!
//! Runs a single pipeline step and passes its result through unchanged.
//!
//! The executor neither retries nor times out a step; transports own their
//! timeouts. Each step is timed and logged as a `STEP_OPERATION` record. A
//! panicking step is reported as a transport failure.

use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::step::PipelineStep;
use crate::adapters::ExternalOperationResult;
use crate::error::ErrorKind;
use crate::logging::log_step_operation;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepExecutor;

impl StepExecutor {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, step, input), fields(step = %step.name()))]
    pub async fn run(
        &self,
        correlation_id: Uuid,
        step: &dyn PipelineStep,
        input: Value,
    ) -> ExternalOperationResult {
        let start = Instant::now();
        debug!(correlation_id = %correlation_id, "Executing step");

        let result = match AssertUnwindSafe(step.execute(input)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = format!("step panicked: {}", panic_message(panic.as_ref()));
                error!(correlation_id = %correlation_id, error = %message, "Step panicked");
                ExternalOperationResult::failure(ErrorKind::Transport, message)
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            ExternalOperationResult::Success { .. } => log_step_operation(
                correlation_id,
                step.name(),
                "success",
                duration_ms,
                None,
                None,
            ),
            ExternalOperationResult::Failure {
                error_kind,
                message,
            } => log_step_operation(
                correlation_id,
                step.name(),
                "failure",
                duration_ms,
                Some(*error_kind),
                Some(message),
            ),
        }

        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
