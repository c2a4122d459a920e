//! # Pipeline
//!
//! Sequential orchestration of dependent external calls.
//!
//! A [`Pipeline`] is an ordered list of [`PipelineStep`]s. The
//! [`PipelineOrchestrator`] runs them one after another through the
//! [`StepExecutor`], short-circuits on the first failure, reports the outcome
//! to a [`NotificationSink`] and returns a single [`PipelineResult`].
//!
//! There is no retry, compensation or persistence at this level.

pub mod executor;
pub mod notification;
pub mod orchestrator;
pub mod step;
pub mod types;

pub use executor::StepExecutor;
pub use notification::{ChatNotificationSink, LogNotificationSink, NotificationSink};
pub use orchestrator::{Pipeline, PipelineOrchestrator};
pub use step::{step_fn, FnStep, PipelineStep};
pub use types::{PipelineOutcome, PipelineResult};
