//! Recording adapter doubles. Each mock returns a canned result and records
//! every call it receives, so tests can assert on order and multiplicity.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use membership_gateway::adapters::{
    ChatNotifier, ExternalOperationResult, LedgerRecord, LedgerStore, NewCustomer, OrgDirectory,
    OrgMember, PaymentGateway,
};
use membership_gateway::pipeline::NotificationSink;
use membership_gateway::ErrorKind;

/// Shared, ordered log of calls across several mocks
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn rejected(message: &str) -> ExternalOperationResult {
    ExternalOperationResult::failure(ErrorKind::Rejected, message)
}

pub fn transport_failure(message: &str) -> ExternalOperationResult {
    ExternalOperationResult::failure(ErrorKind::Transport, message)
}

pub struct MockPayments {
    log: CallLog,
    customer_result: ExternalOperationResult,
    subscription_result: ExternalOperationResult,
    pub customers: Mutex<Vec<NewCustomer>>,
}

impl MockPayments {
    pub fn succeeding(log: CallLog) -> Self {
        Self::new(
            log,
            ExternalOperationResult::success(json!({ "customer_id": "cus_123" })),
            ExternalOperationResult::success(
                json!({ "customer_id": "cus_123", "subscription_id": "sub_456" }),
            ),
        )
    }

    pub fn new(
        log: CallLog,
        customer_result: ExternalOperationResult,
        subscription_result: ExternalOperationResult,
    ) -> Self {
        Self {
            log,
            customer_result,
            subscription_result,
            customers: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPayments {
    async fn create_customer(&self, customer: &NewCustomer) -> ExternalOperationResult {
        self.log.lock().unwrap().push("create_customer".to_string());
        self.customers.lock().unwrap().push(customer.clone());
        self.customer_result.clone()
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        plan_id: &str,
    ) -> ExternalOperationResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("create_subscription:{customer_id}:{plan_id}"));
        self.subscription_result.clone()
    }
}

pub struct MockLedger {
    log: CallLog,
    result: ExternalOperationResult,
    delay: Duration,
    pub rows: Mutex<Vec<LedgerRecord>>,
}

impl MockLedger {
    pub fn succeeding(log: CallLog) -> Self {
        Self::new(
            log,
            ExternalOperationResult::success(json!({ "updated_range": "Sheet1!A2:I2" })),
        )
    }

    pub fn new(log: CallLog, result: ExternalOperationResult) -> Self {
        Self {
            log,
            result,
            delay: Duration::ZERO,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Answer only after `delay`, like a slow upstream
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl LedgerStore for MockLedger {
    async fn append_row(&self, record: &LedgerRecord) -> ExternalOperationResult {
        self.log.lock().unwrap().push("append_ledger_row".to_string());
        self.rows.lock().unwrap().push(record.clone());
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

pub struct MockChat {
    result: ExternalOperationResult,
    pub messages: Mutex<Vec<String>>,
}

impl MockChat {
    pub fn succeeding() -> Self {
        Self::new(ExternalOperationResult::success(json!({ "ts": "1700000000.000100" })))
    }

    pub fn new(result: ExternalOperationResult) -> Self {
        Self {
            result,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNotifier for MockChat {
    async fn post_message(&self, text: &str) -> ExternalOperationResult {
        self.messages.lock().unwrap().push(text.to_string());
        self.result.clone()
    }
}

pub struct MockDirectory {
    log: CallLog,
    pub find_result: ExternalOperationResult,
    pub invite_result: ExternalOperationResult,
    pub feed_result: ExternalOperationResult,
    /// Applied to invites and feeds
    pub delay: Duration,
}

impl MockDirectory {
    pub fn succeeding(log: CallLog) -> Self {
        Self {
            log,
            find_result: ExternalOperationResult::success(json!({ "login": "aino", "id": 7 })),
            invite_result: ExternalOperationResult::success(
                json!({ "login": "aino", "state": "pending" }),
            ),
            feed_result: ExternalOperationResult::success(json!([{ "id": "1" }])),
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl OrgDirectory for MockDirectory {
    async fn find_member_by_email(&self, email: &str) -> ExternalOperationResult {
        self.log.lock().unwrap().push(format!("find_member:{email}"));
        self.find_result.clone()
    }

    async fn invite_member(&self, member: &OrgMember) -> ExternalOperationResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("invite_member:{}", member.login));
        tokio::time::sleep(self.delay).await;
        self.invite_result.clone()
    }

    async fn recent_events(&self, amount: u8) -> ExternalOperationResult {
        self.log.lock().unwrap().push(format!("recent_events:{amount}"));
        tokio::time::sleep(self.delay).await;
        self.feed_result.clone()
    }

    async fn public_members(&self) -> ExternalOperationResult {
        self.log.lock().unwrap().push("public_members".to_string());
        tokio::time::sleep(self.delay).await;
        self.feed_result.clone()
    }
}

/// Sink that keeps every notification in memory
#[derive(Default)]
pub struct RecordingSink {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
