#![allow(dead_code)]

pub mod mock_adapters;
pub mod strategies;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use membership_gateway::pipeline::NotificationSink;
use membership_gateway::web::{create_app, AppState};
use membership_gateway::workflows::MembershipServices;

pub use mock_adapters::*;

pub const PLAN_ID: &str = "test-plan";

/// All mocks behind one app, with handles kept for assertions
pub struct TestGateway {
    pub log: CallLog,
    pub payments: Arc<MockPayments>,
    pub ledger: Arc<MockLedger>,
    pub chat: Arc<MockChat>,
    pub directory: Arc<MockDirectory>,
    pub sink: Arc<RecordingSink>,
}

impl TestGateway {
    /// Every adapter succeeds
    pub fn succeeding() -> Self {
        let log = call_log();
        Self {
            payments: Arc::new(MockPayments::succeeding(log.clone())),
            ledger: Arc::new(MockLedger::succeeding(log.clone())),
            chat: Arc::new(MockChat::succeeding()),
            directory: Arc::new(MockDirectory::succeeding(log.clone())),
            sink: Arc::new(RecordingSink::default()),
            log,
        }
    }

    pub fn with_payments(mut self, build: impl FnOnce(CallLog) -> MockPayments) -> Self {
        self.payments = Arc::new(build(self.log.clone()));
        self
    }

    pub fn with_ledger(mut self, build: impl FnOnce(CallLog) -> MockLedger) -> Self {
        self.ledger = Arc::new(build(self.log.clone()));
        self
    }

    pub fn with_chat(mut self, chat: MockChat) -> Self {
        self.chat = Arc::new(chat);
        self
    }

    pub fn with_directory(mut self, build: impl FnOnce(CallLog) -> MockDirectory) -> Self {
        self.directory = Arc::new(build(self.log.clone()));
        self
    }

    pub fn state(&self) -> Arc<AppState> {
        let sink: Arc<dyn NotificationSink> = self.sink.clone();
        Arc::new(AppState::new(
            MembershipServices {
                payments: self.payments.clone(),
                ledger: self.ledger.clone(),
                plan_id: PLAN_ID.to_string(),
                added_by: "test-suite".to_string(),
            },
            self.chat.clone(),
            self.directory.clone(),
            sink,
            "test",
        ))
    }

    pub fn app(&self) -> Router {
        self.app_with_timeout(Duration::from_secs(10))
    }

    pub fn app_with_timeout(&self, request_timeout: Duration) -> Router {
        create_app(self.state(), request_timeout)
    }

    pub fn calls(&self) -> Vec<String> {
        calls(&self.log)
    }
}

/// Send one request through the router and collect status and body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn membership_body() -> serde_json::Value {
    serde_json::json!({
        "userInfo": {
            "name": "Aino Virtanen",
            "email": "aino@example.com",
            "address": "Mannerheimintie 1",
            "postcode": "00100",
            "city": "Helsinki",
            "handle": "aino"
        },
        "stripeToken": "tok_visa"
    })
}
