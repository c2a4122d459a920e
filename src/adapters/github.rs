//! # GitHub Organization Directory
//!
//! Member lookup, membership invitations and the read-only organization feeds
//! (recent events, public members). Reads and the membership `PUT` are
//! idempotent and go through the retrying send path.

use async_trait::async_trait;
use reqwest::{header, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::http::{required_str, HttpTransport};
use super::{ExternalOperationResult, OrgDirectory, OrgMember};
use crate::config::GithubConfig;
use crate::error::AdapterError;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubOrgDirectory {
    transport: HttpTransport,
    token: String,
    organization: String,
    api_base: String,
}

impl GithubOrgDirectory {
    pub fn new(config: &GithubConfig, transport: HttpTransport) -> Self {
        Self {
            transport,
            token: config.token.clone(),
            organization: config.organization.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, GITHUB_MEDIA_TYPE)
    }

    fn org_url(&self, path: &str) -> String {
        format!("{}/orgs/{}/{}", self.api_base, self.organization, path)
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, AdapterError> {
        let response = self
            .transport
            .send_idempotent(|| self.authorized(self.transport.client().get(url).query(query)))
            .await?;
        self.transport.decode(response).await
    }

    async fn try_find_member(&self, email: &str) -> Result<Value, AdapterError> {
        let url = format!("{}/search/users", self.api_base);
        let body = self.get_json(&url, &[("q", email.to_string())]).await?;
        let member = first_search_hit(&body)?;
        Ok(json!(member))
    }

    async fn try_invite(&self, member: &OrgMember) -> Result<Value, AdapterError> {
        let url = self.org_url(&format!("memberships/{}", member.login));
        let response = self
            .transport
            .send_idempotent(|| {
                self.authorized(self.transport.client().put(&url))
                    .json(&json!({ "role": "member" }))
            })
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(self.transport.rejection(status, &body));
        }

        let body: Value = self.transport.decode(response).await?;
        let login = body
            .pointer("/user/login")
            .and_then(Value::as_str)
            .unwrap_or(member.login.as_str());
        let state = required_str(&body, "/state")?;

        info!(login = %login, state = %state, "Organization membership updated");
        Ok(json!({ "login": login, "state": state }))
    }

    async fn try_array(&self, url: &str, query: &[(&str, String)]) -> Result<Value, AdapterError> {
        let body = self.get_json(url, query).await?;
        if body.is_array() {
            Ok(body)
        } else {
            Err(AdapterError::malformed("expected a JSON array"))
        }
    }
}

/// First user of a search response
fn first_search_hit(body: &Value) -> Result<OrgMember, AdapterError> {
    let items = match body.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None => {
            return Err(match body.get("message").and_then(Value::as_str) {
                Some(message) => AdapterError::rejected(message),
                None => AdapterError::malformed("search response has no items"),
            })
        }
    };

    let first = items
        .first()
        .ok_or_else(|| AdapterError::rejected("Not Found"))?;

    serde_json::from_value(first.clone())
        .map_err(|e| AdapterError::malformed(format!("unexpected search result: {e}")))
}

#[async_trait]
impl OrgDirectory for GithubOrgDirectory {
    #[instrument(skip(self))]
    async fn find_member_by_email(&self, email: &str) -> ExternalOperationResult {
        self.try_find_member(email).await.into()
    }

    #[instrument(skip(self, member), fields(login = %member.login, org = %self.organization))]
    async fn invite_member(&self, member: &OrgMember) -> ExternalOperationResult {
        self.try_invite(member).await.into()
    }

    #[instrument(skip(self), fields(org = %self.organization))]
    async fn recent_events(&self, amount: u8) -> ExternalOperationResult {
        let url = self.org_url("events");
        self.try_array(&url, &[("per_page", amount.to_string())])
            .await
            .into()
    }

    #[instrument(skip(self), fields(org = %self.organization))]
    async fn public_members(&self) -> ExternalOperationResult {
        let url = self.org_url("public_members");
        self.try_array(&url, &[]).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_is_returned() {
        let body = json!({
            "total_count": 2,
            "items": [
                {"login": "aino", "id": 7, "type": "User"},
                {"login": "other", "id": 8, "type": "User"}
            ]
        });
        assert_eq!(
            first_search_hit(&body).unwrap(),
            OrgMember {
                login: "aino".to_string(),
                id: 7
            }
        );
    }

    #[test]
    fn test_empty_search_is_not_found() {
        let body = json!({"total_count": 0, "items": []});
        assert_eq!(
            first_search_hit(&body),
            Err(AdapterError::rejected("Not Found"))
        );
    }

    #[test]
    fn test_missing_items_uses_api_message() {
        let body = json!({"message": "Validation Failed"});
        assert_eq!(
            first_search_hit(&body),
            Err(AdapterError::rejected("Validation Failed"))
        );
        assert!(matches!(
            first_search_hit(&json!({})),
            Err(AdapterError::MalformedResponse(_))
        ));
    }
}
