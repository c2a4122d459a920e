//! # HTTP Transport
//!
//! Shared reqwest plumbing for every adapter: client construction from
//! [`HttpClientConfig`], bounded retry for idempotent requests, and the
//! normalization of responses into [`AdapterError`] categories.
//!
//! | Condition | Error |
//! |---|---|
//! | connect / timeout / body read failure | `Transport` |
//! | non-2xx status | `Rejected` (remote message when one can be found) |
//! | 2xx with unparsable or incomplete body | `MalformedResponse` |

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{ConfigResult, ConfigurationError, HttpClientConfig};
use crate::error::AdapterError;

/// Retry budget applied to idempotent requests only
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff: base, 2x base, 4x base, ...
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX))
    }
}

impl From<&HttpClientConfig> for RetryPolicy {
    fn from(config: &HttpClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }
}

/// reqwest client bound to one remote service
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    service: &'static str,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(service: &'static str, config: &HttpClientConfig) -> ConfigResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigurationError::http_client_error(service, e))?;

        debug!(
            service = service,
            timeout_ms = config.timeout_ms,
            max_retries = config.max_retries,
            "Created HTTP transport"
        );

        Ok(Self {
            client,
            service,
            retry: RetryPolicy::from(config),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Send a request exactly once. Used for every side-effecting call.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, AdapterError> {
        request.send().await.map_err(|e| {
            AdapterError::transport(format!("{} request failed: {}", self.service, e))
        })
    }

    /// Send an idempotent request, retrying transport failures only
    pub async fn send_idempotent<F>(&self, build: F) -> Result<Response, AdapterError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        loop {
            match self.send(build()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && retries < self.retry.max_retries => {
                    retries += 1;
                    warn!(
                        service = self.service,
                        error = %err,
                        retry = retries,
                        max_retries = self.retry.max_retries,
                        "Transport error, will retry"
                    );
                    tokio::time::sleep(self.retry.delay_for(retries)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Decode a 2xx JSON body, or turn anything else into the matching error
    pub async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, AdapterError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AdapterError::transport(format!("{} response read failed: {}", self.service, e))
        })?;

        if !status.is_success() {
            return Err(self.rejection(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AdapterError::malformed(format!("{} returned an unexpected body: {}", self.service, e))
        })
    }

    /// Build the rejection for a non-2xx response body
    pub fn rejection(&self, status: StatusCode, body: &str) -> AdapterError {
        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()));
        warn!(
            service = self.service,
            status = %status,
            message = %message,
            "Remote service rejected request"
        );
        AdapterError::rejected(message)
    }
}

/// Find a human-readable message in the common error body shapes:
/// `{"error": {"message": ..}}`, `{"message": ..}` and `{"error": ".."}`
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Pull a required string field out of a decoded body
pub fn required_str<'a>(value: &'a Value, pointer: &str) -> Result<&'a str, AdapterError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::malformed(format!("missing field {pointer}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_nested_error_message() {
        let body = r#"{"error": {"type": "card_error", "message": "Your card was declined."}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Your card was declined.")
        );
    }

    #[test]
    fn test_extracts_flat_messages() {
        assert_eq!(
            extract_error_message(r#"{"message": "Bad credentials"}"#).as_deref(),
            Some("Bad credentials")
        );
        assert_eq!(
            extract_error_message(r#"{"ok": false, "error": "invalid_auth"}"#).as_deref(),
            Some("invalid_auth")
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_required_str_reports_missing_field() {
        let value = serde_json::json!({"id": "cus_1"});
        assert_eq!(required_str(&value, "/id"), Ok("cus_1"));
        assert_eq!(
            required_str(&value, "/object"),
            Err(AdapterError::malformed("missing field /object"))
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(RetryPolicy::none().delay_for(1), Duration::ZERO);
    }
}
