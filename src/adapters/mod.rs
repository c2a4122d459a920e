//! # Remote Service Adapters
//!
//! One trait per external service, each operation returning an
//! [`ExternalOperationResult`]. Implementations fail closed: transport errors,
//! non-2xx statuses and malformed bodies all come back as
//! `Failure { error_kind, message }`, never as a panic or an `Err`.
//!
//! | Trait | Service | Operations |
//! |---|---|---|
//! | [`PaymentGateway`] | Stripe | create customer, create subscription |
//! | [`LedgerStore`] | Google Sheets | append ledger row |
//! | [`ChatNotifier`] | Slack | post message |
//! | [`OrgDirectory`] | GitHub | find member, invite member, events, public members |
//!
//! None of the adapters attach idempotency keys: repeating an operation
//! repeats its side effect on the remote service.

pub mod github;
pub mod google_auth;
pub mod http;
pub mod sheets;
pub mod slack;
pub mod stripe;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::ledger_columns;
use crate::error::{AdapterError, ErrorKind};

pub use github::GithubOrgDirectory;
pub use sheets::GoogleSheetsLedger;
pub use slack::SlackNotifier;
pub use stripe::StripePaymentGateway;

/// Tagged outcome of one adapter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExternalOperationResult {
    Success { payload: Value },
    Failure { error_kind: ErrorKind, message: String },
}

impl ExternalOperationResult {
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    pub fn failure(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            error_kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error_kind, .. } => Some(*error_kind),
        }
    }

    /// Back into `Result` form for callers outside a pipeline
    pub fn into_result(self) -> Result<Value, AdapterError> {
        match self {
            Self::Success { payload } => Ok(payload),
            Self::Failure {
                error_kind: ErrorKind::Transport,
                message,
            } => Err(AdapterError::Transport(message)),
            Self::Failure {
                error_kind: ErrorKind::Rejected,
                message,
            } => Err(AdapterError::Rejected(message)),
            Self::Failure {
                error_kind: ErrorKind::Malformed,
                message,
            } => Err(AdapterError::MalformedResponse(message)),
        }
    }
}

impl From<Result<Value, AdapterError>> for ExternalOperationResult {
    fn from(result: Result<Value, AdapterError>) -> Self {
        match result {
            Ok(payload) => Self::Success { payload },
            Err(err) => {
                let error_kind = err.kind();
                let message = match err {
                    AdapterError::Transport(m)
                    | AdapterError::Rejected(m)
                    | AdapterError::MalformedResponse(m) => m,
                };
                Self::Failure {
                    error_kind,
                    message,
                }
            }
        }
    }
}

/// Customer to create at the payment processor
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub description: String,
    pub email: String,
    pub metadata: BTreeMap<String, String>,
    /// Single-use payment source token produced by the checkout form
    pub source: String,
}

/// One member row for the ledger, keyed by the sheet's column headers
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub fee_paid_on: NaiveDate,
    pub street_address: String,
    pub full_name: String,
    pub joined_on: NaiveDate,
    pub added_by: String,
    pub city: String,
    pub postcode: String,
    pub chat_handle: String,
    pub email: String,
}

impl LedgerRecord {
    /// Column header and cell value pairs, in canonical column order
    pub fn cells(&self) -> Vec<(&'static str, String)> {
        let date = |d: &NaiveDate| d.format(ledger_columns::DATE_FORMAT).to_string();
        vec![
            (ledger_columns::FEE_PAID_ON, date(&self.fee_paid_on)),
            (ledger_columns::STREET_ADDRESS, self.street_address.clone()),
            (ledger_columns::FULL_NAME, self.full_name.clone()),
            (ledger_columns::JOINED_ON, date(&self.joined_on)),
            (ledger_columns::ADDED_BY, self.added_by.clone()),
            (ledger_columns::CITY, self.city.clone()),
            (ledger_columns::POSTCODE, self.postcode.clone()),
            (ledger_columns::CHAT_HANDLE, self.chat_handle.clone()),
            (ledger_columns::EMAIL, self.email.clone()),
        ]
    }
}

/// Identity of an account on the source-hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMember {
    pub login: String,
    pub id: u64,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Success payload: `{"customer_id": ...}`
    async fn create_customer(&self, customer: &NewCustomer) -> ExternalOperationResult;

    /// Success payload: `{"customer_id": ..., "subscription_id": ...}`
    async fn create_subscription(&self, customer_id: &str, plan_id: &str)
        -> ExternalOperationResult;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Success payload: `{"updated_range": ...}`
    async fn append_row(&self, record: &LedgerRecord) -> ExternalOperationResult;
}

#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Success payload: `{"ts": ...}`
    async fn post_message(&self, text: &str) -> ExternalOperationResult;
}

#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Success payload: an [`OrgMember`] as JSON
    async fn find_member_by_email(&self, email: &str) -> ExternalOperationResult;

    /// Success payload: `{"login": ..., "state": ...}`
    async fn invite_member(&self, member: &OrgMember) -> ExternalOperationResult;

    /// Success payload: JSON array of the latest organization events
    async fn recent_events(&self, amount: u8) -> ExternalOperationResult;

    /// Success payload: JSON array of public organization members
    async fn public_members(&self) -> ExternalOperationResult;
}
