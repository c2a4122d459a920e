//! # Structured Logging Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//! Designed for containerized deployments where logs go to stdout.
//!
//! - Log level comes from `RUST_LOG` when set, otherwise from the environment
//!   (`MEMBERSHIP_ENV=production` logs at `info`, everything else at `debug`)
//! - `MEMBERSHIP_LOG_FORMAT=json` switches the console layer to JSON lines
//! - ANSI colors only when stdout is a terminal

use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

use crate::constants::env;
use crate::error::ErrorKind;

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize the global tracing subscriber once per process
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var(env::LOG_FORMAT)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(filter)
                .boxed()
        };

        // A subscriber may already be installed by a test harness
        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized");
        } else {
            tracing::info!(
                environment = %environment,
                json_output = json,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Current deployment environment
pub fn get_environment() -> String {
    std::env::var(env::ENVIRONMENT).unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for one executed pipeline step
pub fn log_step_operation(
    correlation_id: Uuid,
    step_name: &str,
    status: &str,
    duration_ms: u64,
    error_kind: Option<ErrorKind>,
    details: Option<&str>,
) {
    tracing::info!(
        correlation_id = %correlation_id,
        step_name = %step_name,
        status = %status,
        duration_ms = duration_ms,
        error_kind = error_kind.map(|k| k.as_str()),
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "STEP_OPERATION"
    );
}

/// Log structured data for a terminal pipeline outcome
pub fn log_pipeline_outcome(
    correlation_id: Uuid,
    workflow: &str,
    outcome: &str,
    failed_step: Option<&str>,
    completed_steps: usize,
) {
    tracing::info!(
        correlation_id = %correlation_id,
        workflow = %workflow,
        outcome = %outcome,
        failed_step = failed_step,
        completed_steps = completed_steps,
        timestamp = %Utc::now().to_rfc3339(),
        "PIPELINE_OUTCOME"
    );
}
