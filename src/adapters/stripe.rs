//! # Stripe Payment Gateway
//!
//! Customer and subscription creation against the Stripe REST API. Both calls
//! are form-encoded POSTs sent exactly once; Stripe error bodies
//! (`{"error": {"message": ..}}`) surface as rejections carrying that message.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::http::{required_str, HttpTransport};
use super::{ExternalOperationResult, NewCustomer, PaymentGateway};
use crate::config::StripeConfig;
use crate::error::AdapterError;

#[derive(Debug, Clone)]
pub struct StripePaymentGateway {
    transport: HttpTransport,
    secret_key: String,
    api_base: String,
}

impl StripePaymentGateway {
    pub fn new(config: &StripeConfig, transport: HttpTransport) -> Self {
        Self {
            transport,
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn customer_form(customer: &NewCustomer) -> Vec<(String, String)> {
        let mut form = vec![
            ("description".to_string(), customer.description.clone()),
            ("email".to_string(), customer.email.clone()),
            ("source".to_string(), customer.source.clone()),
        ];
        form.extend(
            customer
                .metadata
                .iter()
                .map(|(key, value)| (format!("metadata[{key}]"), value.clone())),
        );
        form
    }

    async fn post_form(&self, path: &str, form: &[(String, String)]) -> Result<Value, AdapterError> {
        let request = self
            .transport
            .client()
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form);
        let response = self.transport.send(request).await?;
        self.transport.decode(response).await
    }

    async fn try_create_customer(&self, customer: &NewCustomer) -> Result<Value, AdapterError> {
        let body = self
            .post_form("/v1/customers", &Self::customer_form(customer))
            .await?;
        let customer_id = required_str(&body, "/id")?;

        info!(customer_id = %customer_id, "Created payment customer");
        Ok(json!({ "customer_id": customer_id }))
    }

    async fn try_create_subscription(
        &self,
        customer_id: &str,
        plan_id: &str,
    ) -> Result<Value, AdapterError> {
        let form = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("items[0][plan]".to_string(), plan_id.to_string()),
        ];
        let body = self.post_form("/v1/subscriptions", &form).await?;
        let subscription_id = required_str(&body, "/id")?;

        info!(
            customer_id = %customer_id,
            subscription_id = %subscription_id,
            "Created subscription"
        );
        Ok(json!({
            "customer_id": customer_id,
            "subscription_id": subscription_id,
        }))
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    #[instrument(skip(self, customer), fields(email = %customer.email))]
    async fn create_customer(&self, customer: &NewCustomer) -> ExternalOperationResult {
        self.try_create_customer(customer).await.into()
    }

    #[instrument(skip(self))]
    async fn create_subscription(
        &self,
        customer_id: &str,
        plan_id: &str,
    ) -> ExternalOperationResult {
        self.try_create_subscription(customer_id, plan_id)
            .await
            .into()
    }
}
