//! # Membership Workflow
//!
//! New member sign-up: create the payment customer, subscribe them to the
//! membership plan, then append their row to the member ledger.
//!
//! The first two steps form the payment stage. A failure there means no
//! membership was recorded. A ledger failure after a successful payment leaves
//! a paying customer without a ledger row; the failure notification names the
//! ledger step so the row can be added by hand.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::{
    ExternalOperationResult, LedgerRecord, LedgerStore, NewCustomer, PaymentGateway,
};
use crate::constants::{responses, steps, workflows};
use crate::error::ErrorKind;
use crate::pipeline::{Pipeline, PipelineResult, PipelineStep};

/// Validated sign-up data; built once at the request boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipInput {
    pub name: String,
    pub email: String,
    pub address: String,
    pub postcode: String,
    pub city: String,
    pub handle: String,
    #[serde(skip_serializing)]
    pub payment_token: String,
}

impl MembershipInput {
    /// Customer description shown in the payment dashboard
    pub fn customer_description(&self) -> String {
        format!("{} - {}", self.handle, self.name)
    }

    /// Member details attached to the payment customer
    pub fn customer_metadata(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("address".to_string(), self.address.clone()),
            ("city".to_string(), self.city.clone()),
            ("email".to_string(), self.email.clone()),
            ("handle".to_string(), self.handle.clone()),
            ("name".to_string(), self.name.clone()),
            ("postcode".to_string(), self.postcode.clone()),
        ])
    }

    pub fn new_customer(&self) -> NewCustomer {
        NewCustomer {
            description: self.customer_description(),
            email: self.email.clone(),
            metadata: self.customer_metadata(),
            source: self.payment_token.clone(),
        }
    }

    /// Ledger row for a member whose fee was paid and who joined on `today`
    pub fn ledger_record(&self, today: NaiveDate, added_by: &str) -> LedgerRecord {
        LedgerRecord {
            fee_paid_on: today,
            street_address: self.address.clone(),
            full_name: self.name.clone(),
            joined_on: today,
            added_by: added_by.to_string(),
            city: self.city.clone(),
            postcode: self.postcode.clone(),
            chat_handle: self.handle.clone(),
            email: self.email.clone(),
        }
    }
}

/// Adapters and settings the membership workflow needs
#[derive(Clone)]
pub struct MembershipServices {
    pub payments: Arc<dyn PaymentGateway>,
    pub ledger: Arc<dyn LedgerStore>,
    pub plan_id: String,
    pub added_by: String,
}

pub struct CreateCustomerStep {
    payments: Arc<dyn PaymentGateway>,
    customer: NewCustomer,
}

#[async_trait]
impl PipelineStep for CreateCustomerStep {
    fn name(&self) -> &str {
        steps::CREATE_CUSTOMER
    }

    async fn execute(&self, _previous: Value) -> ExternalOperationResult {
        self.payments.create_customer(&self.customer).await
    }
}

pub struct CreateSubscriptionStep {
    payments: Arc<dyn PaymentGateway>,
    plan_id: String,
}

#[async_trait]
impl PipelineStep for CreateSubscriptionStep {
    fn name(&self) -> &str {
        steps::CREATE_SUBSCRIPTION
    }

    async fn execute(&self, previous: Value) -> ExternalOperationResult {
        match previous.get("customer_id").and_then(Value::as_str) {
            Some(customer_id) => {
                self.payments
                    .create_subscription(customer_id, &self.plan_id)
                    .await
            }
            None => ExternalOperationResult::failure(
                ErrorKind::Malformed,
                "previous step did not produce a customer_id",
            ),
        }
    }
}

pub struct AppendLedgerRowStep {
    ledger: Arc<dyn LedgerStore>,
    record: LedgerRecord,
}

#[async_trait]
impl PipelineStep for AppendLedgerRowStep {
    fn name(&self) -> &str {
        steps::APPEND_LEDGER_ROW
    }

    async fn execute(&self, _previous: Value) -> ExternalOperationResult {
        self.ledger.append_row(&self.record).await
    }
}

/// customer → subscription → ledger row
pub fn membership_pipeline(
    input: &MembershipInput,
    services: &MembershipServices,
    today: NaiveDate,
) -> Pipeline {
    Pipeline::new(workflows::MEMBERSHIP, input.email.clone())
        .step(Box::new(CreateCustomerStep {
            payments: Arc::clone(&services.payments),
            customer: input.new_customer(),
        }))
        .step(Box::new(CreateSubscriptionStep {
            payments: Arc::clone(&services.payments),
            plan_id: services.plan_id.clone(),
        }))
        .step(Box::new(AppendLedgerRowStep {
            ledger: Arc::clone(&services.ledger),
            record: input.ledger_record(today, &services.added_by),
        }))
}

/// How far a membership run got, as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// Paid and recorded
    Completed,
    /// Payment stage failed; nothing was recorded
    PaymentFailed,
    /// Paid, but the ledger row could not be written
    StorageFailed,
}

impl MembershipOutcome {
    pub fn from_result(result: &PipelineResult) -> Self {
        match result.failed_step() {
            None => Self::Completed,
            Some(step) if steps::PAYMENT_STAGE.contains(&step) => Self::PaymentFailed,
            Some(_) => Self::StorageFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn response_body(&self) -> &'static str {
        match self {
            Self::Completed => responses::PAYMENT_SUCCESS,
            Self::PaymentFailed => responses::PAYMENT_ERROR,
            Self::StorageFailed => responses::MEMBERSHIP_STORAGE_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MembershipInput {
        MembershipInput {
            name: "Aino Virtanen".to_string(),
            email: "aino@example.com".to_string(),
            address: "Mannerheimintie 1".to_string(),
            postcode: "00100".to_string(),
            city: "Helsinki".to_string(),
            handle: "aino".to_string(),
            payment_token: "tok_visa".to_string(),
        }
    }

    #[test]
    fn test_customer_carries_description_and_metadata() {
        let customer = input().new_customer();
        assert_eq!(customer.description, "aino - Aino Virtanen");
        assert_eq!(customer.source, "tok_visa");
        assert_eq!(customer.metadata.get("city").map(String::as_str), Some("Helsinki"));
        assert_eq!(customer.metadata.len(), 6);
    }

    #[test]
    fn test_ledger_record_uses_same_day_for_both_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let record = input().ledger_record(today, "membership-gateway");
        assert_eq!(record.fee_paid_on, today);
        assert_eq!(record.joined_on, today);
        assert_eq!(record.chat_handle, "aino");
        assert_eq!(record.added_by, "membership-gateway");
    }

    #[test]
    fn test_outcome_mapping_by_failed_step() {
        use uuid::Uuid;

        let failed_at = |step: &str| {
            PipelineResult::failed(
                workflows::MEMBERSHIP,
                Uuid::new_v4(),
                vec![],
                step,
                ErrorKind::Transport,
                "down".to_string(),
            )
        };

        assert_eq!(
            MembershipOutcome::from_result(&failed_at(steps::CREATE_CUSTOMER)).response_body(),
            "payment_error"
        );
        assert_eq!(
            MembershipOutcome::from_result(&failed_at(steps::CREATE_SUBSCRIPTION)),
            MembershipOutcome::PaymentFailed
        );
        assert_eq!(
            MembershipOutcome::from_result(&failed_at(steps::APPEND_LEDGER_ROW)).response_body(),
            "membership_storage_error"
        );
    }
}
