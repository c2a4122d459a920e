//! # Pipeline Steps
//!
//! A step wraps exactly one external operation. It receives the payload of
//! the previous step (or the pipeline input for the first step) and returns
//! the adapter's result untouched. Steps hold no per-run state.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::adapters::ExternalOperationResult;

#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Stable name reported in results and notifications
    fn name(&self) -> &str;

    async fn execute(&self, previous: Value) -> ExternalOperationResult;
}

/// Step backed by a closure returning a boxed future
pub struct FnStep<F> {
    name: String,
    run: F,
}

impl<F> FnStep<F>
where
    F: Fn(Value) -> BoxFuture<'static, ExternalOperationResult> + Send + Sync,
{
    pub fn new(name: impl Into<String>, run: F) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }
}

#[async_trait]
impl<F> PipelineStep for FnStep<F>
where
    F: Fn(Value) -> BoxFuture<'static, ExternalOperationResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, previous: Value) -> ExternalOperationResult {
        (self.run)(previous).await
    }
}

/// Box a closure step for use in a [`Pipeline`](super::Pipeline)
pub fn step_fn<F>(name: impl Into<String>, run: F) -> Box<dyn PipelineStep>
where
    F: Fn(Value) -> BoxFuture<'static, ExternalOperationResult> + Send + Sync + 'static,
{
    Box::new(FnStep::new(name, run))
}
