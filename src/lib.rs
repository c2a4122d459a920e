#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Membership Gateway
//!
//! HTTP gateway that turns a single inbound request into a short, ordered
//! sequence of calls against independent third-party services, and reports
//! one aggregate outcome back to the caller.
//!
//! ## Overview
//!
//! A membership sign-up creates a payment customer, subscribes it to the
//! membership plan and appends the member to a spreadsheet ledger. Each call
//! can fail on its own; later calls depend on earlier ones; and the caller is
//! told exactly how far the run got (`payment_error` means nothing happened,
//! `membership_storage_error` means the member paid but was not recorded).
//! Every terminal outcome is mirrored to an operator chat channel.
//!
//! ## Module Organization
//!
//! - [`adapters`] - One client per remote service, normalized results
//! - [`pipeline`] - Step executor, orchestrator and notification sinks
//! - [`workflows`] - Concrete pipelines and their caller-facing outcomes
//! - [`web`] - axum routes, request validation and response mapping
//! - [`config`] - Layered configuration
//! - [`bootstrap`] - Wiring of adapters and web state from configuration
//! - [`logging`] - Structured console logging
//! - [`error`] - Error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use membership_gateway::bootstrap::GatewayBootstrap;
//! use membership_gateway::config::ConfigManager;
//! use membership_gateway::web::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let state = GatewayBootstrap::build_state(&manager)?;
//! let app = create_app(state, manager.config().server.request_timeout());
//!
//! let listener = tokio::net::TcpListener::bind(&manager.config().server.bind_address).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and integration tests
//! ```

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod web;
pub mod workflows;

pub use adapters::{ExternalOperationResult, OrgMember};
pub use config::{ConfigManager, GatewayConfig};
pub use error::{AdapterError, ErrorKind, GatewayError, Result};
pub use pipeline::{Pipeline, PipelineOrchestrator, PipelineResult, PipelineStep};
