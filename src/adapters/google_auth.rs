//! # Service Account Authentication
//!
//! OAuth2 JWT-bearer flow for Google service accounts: sign an RS256 assertion
//! with the account's private key, exchange it at the token URI for a
//! short-lived access token.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::http::HttpTransport;
use crate::config::{ConfigResult, ConfigurationError, GoogleConfig};
use crate::error::AdapterError;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Source of bearer tokens for the spreadsheet API
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AdapterError>;
}

/// JWT claims of a service account assertion
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct ServiceAccountAuthenticator {
    transport: HttpTransport,
    client_email: String,
    token_uri: String,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for ServiceAccountAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuthenticator")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountAuthenticator {
    pub fn from_config(config: &GoogleConfig, transport: HttpTransport) -> ConfigResult<Self> {
        let encoding_key = Self::parse_private_key(&config.private_key)?;

        debug!(
            client_email = %config.client_email,
            token_uri = %config.token_uri,
            "Service account authenticator configured"
        );

        Ok(Self {
            transport,
            client_email: config.client_email.clone(),
            token_uri: config.token_uri.clone(),
            encoding_key,
        })
    }

    /// Parse the PEM private key. Keys pasted into environment variables
    /// usually carry literal `\n` sequences instead of line breaks.
    fn parse_private_key(pem: &str) -> ConfigResult<EncodingKey> {
        let normalized = pem.replace("\\n", "\n");
        EncodingKey::from_rsa_pem(normalized.as_bytes()).map_err(|e| {
            ConfigurationError::invalid_value(
                "google.private_key",
                "[redacted]",
                format!("not a valid RSA private key: {e}"),
            )
        })
    }

    /// Signed RS256 assertion valid for one hour
    pub fn signed_assertion(&self) -> Result<String, AdapterError> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to sign service account assertion");
            AdapterError::rejected(format!("auth failure: {e}"))
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountAuthenticator {
    #[instrument(skip(self), fields(client_email = %self.client_email))]
    async fn access_token(&self) -> Result<String, AdapterError> {
        let assertion = self.signed_assertion()?;

        let request = self
            .transport
            .client()
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]);
        let response = self.transport.send(request).await?;

        let token: TokenResponse = self.transport.decode(response).await.map_err(|e| match e {
            AdapterError::Rejected(reason) => AdapterError::rejected(format!("auth failure: {reason}")),
            other => other,
        })?;

        debug!("Obtained spreadsheet access token");
        Ok(token.access_token)
    }
}
