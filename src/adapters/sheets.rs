//! # Google Sheets Ledger
//!
//! Appends member rows to the ledger worksheet. One logical append is three
//! requests: obtain an access token, read the header row, append the row with
//! cells placed under the matching headers. A header row that lacks one of the
//! ledger columns is a schema mismatch and nothing is written.
//!
//! Rows are written with `USER_ENTERED` so the date columns become dates.
//! Text columns such as the postcode carry a leading `'` to keep leading zeros.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::google_auth::AccessTokenProvider;
use super::http::HttpTransport;
use super::{ExternalOperationResult, LedgerRecord, LedgerStore};
use crate::config::{ConfigResult, ConfigurationError, GoogleConfig};
use crate::constants::ledger_columns;
use crate::error::AdapterError;

pub struct GoogleSheetsLedger {
    transport: HttpTransport,
    auth: Arc<dyn AccessTokenProvider>,
    api_base: Url,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetsLedger {
    pub fn new(
        config: &GoogleConfig,
        transport: HttpTransport,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> ConfigResult<Self> {
        let api_base = Url::parse(&config.api_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ConfigurationError::invalid_value(
                    "google.api_base",
                    &config.api_base,
                    "must be an absolute http(s) URL",
                )
            })?;

        Ok(Self {
            transport,
            auth,
            api_base,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
        })
    }

    /// `values/{range}` URL with the range percent-encoded as one path segment
    fn values_url(&self, range: &str) -> Result<Url, AdapterError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AdapterError::transport(format!("cannot extend URL {}", self.api_base)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn header_row(&self, token: &str) -> Result<Vec<String>, AdapterError> {
        let url = self.values_url(&format!("{}!1:1", self.worksheet))?;
        let response = self
            .transport
            .send_idempotent(|| self.transport.client().get(url.clone()).bearer_auth(token))
            .await?;
        let body: Value = self.transport.decode(response).await?;

        let header = body
            .pointer("/values/0")
            .and_then(Value::as_array)
            .ok_or_else(|| AdapterError::malformed("ledger worksheet has no header row"))?;

        Ok(header
            .iter()
            .map(|cell| cell.as_str().unwrap_or_default().to_string())
            .collect())
    }

    async fn try_append(&self, record: &LedgerRecord) -> Result<Value, AdapterError> {
        let token = self.auth.access_token().await?;
        let header = self.header_row(&token).await?;
        let row = arrange_row(&header, record)?;

        debug!(columns = header.len(), "Appending ledger row");

        let url = self.values_url(&format!("{}!A1:append", self.worksheet))?;
        let request = self
            .transport
            .client()
            .post(url)
            .bearer_auth(&token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }));
        let response = self.transport.send(request).await?;
        let body: Value = self.transport.decode(response).await?;

        let updated_range = body
            .pointer("/updates/updatedRange")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::malformed("append response missing updates.updatedRange"))?;

        info!(updated_range = %updated_range, "Ledger row appended");
        Ok(json!({ "updated_range": updated_range }))
    }
}

/// Place each ledger cell under its header; unknown headers get empty cells.
/// Text columns are prefixed with `'` so the sheet does not parse them.
pub fn arrange_row(header: &[String], record: &LedgerRecord) -> Result<Vec<String>, AdapterError> {
    let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut row = vec![String::new(); header.len()];

    for (column, value) in record.cells() {
        let index = normalized
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| {
                AdapterError::rejected(format!(
                    "sheet schema mismatch: column '{column}' not found in header row"
                ))
            })?;
        row[index] = if ledger_columns::TEXT.contains(&column) {
            format!("'{value}")
        } else {
            value
        };
    }

    Ok(row)
}

#[async_trait]
impl LedgerStore for GoogleSheetsLedger {
    #[instrument(skip(self, record), fields(email = %record.email, worksheet = %self.worksheet))]
    async fn append_row(&self, record: &LedgerRecord) -> ExternalOperationResult {
        self.try_append(record).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ledger_columns;
    use chrono::NaiveDate;

    fn record() -> LedgerRecord {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        LedgerRecord {
            fee_paid_on: day,
            street_address: "Katu 1".to_string(),
            full_name: "Aino A".to_string(),
            joined_on: day,
            added_by: "gateway".to_string(),
            city: "Oulu".to_string(),
            postcode: "90100".to_string(),
            chat_handle: "aino".to_string(),
            email: "aino@example.com".to_string(),
        }
    }

    #[test]
    fn test_row_follows_header_order() {
        let mut header: Vec<String> = ledger_columns::ALL.iter().rev().map(|c| c.to_string()).collect();
        header.insert(3, "muistiinpanot".to_string());

        let row = arrange_row(&header, &record()).unwrap();

        assert_eq!(row.len(), 10);
        assert_eq!(row[0], "aino@example.com");
        assert_eq!(row[3], "");
        assert_eq!(row[9], "02.01.2024");
    }

    #[test]
    fn test_header_match_ignores_case_and_whitespace() {
        let header: Vec<String> = ledger_columns::ALL
            .iter()
            .map(|c| format!(" {} ", c.to_uppercase()))
            .collect();
        let row = arrange_row(&header, &record()).unwrap();
        assert_eq!(row[2], "Aino A");
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        let header = vec!["koko nimi".to_string(), "sähköposti".to_string()];
        let err = arrange_row(&header, &record()).unwrap_err();
        assert!(matches!(err, AdapterError::Rejected(ref m) if m.contains("schema mismatch")));
    }

    #[test]
    fn test_postcode_is_written_as_text() {
        let header: Vec<String> = ledger_columns::ALL.iter().map(|c| c.to_string()).collect();
        let postcode = header
            .iter()
            .position(|h| h == ledger_columns::POSTCODE)
            .unwrap();

        let mut record = record();
        record.postcode = "00100".to_string();
        let row = arrange_row(&header, &record).unwrap();

        assert_eq!(row[postcode], "'00100");
        assert_eq!(row[0], "02.01.2024");
    }

    struct NoToken;

    #[async_trait]
    impl AccessTokenProvider for NoToken {
        async fn access_token(&self) -> Result<String, AdapterError> {
            Err(AdapterError::transport("unused"))
        }
    }

    fn ledger(api_base: &str, worksheet: &str) -> ConfigResult<GoogleSheetsLedger> {
        let config = GoogleConfig {
            spreadsheet_id: "sheet-1".to_string(),
            worksheet: worksheet.to_string(),
            api_base: api_base.to_string(),
            ..GoogleConfig::default()
        };
        let transport = HttpTransport::new("google-sheets", &Default::default()).unwrap();
        GoogleSheetsLedger::new(&config, transport, Arc::new(NoToken))
    }

    #[test]
    fn test_range_is_percent_encoded_into_one_segment() {
        let ledger = ledger("https://sheets.example.com/", "Q1 #2/3?").unwrap();
        let url = ledger.values_url("Q1 #2/3?!A1:append").unwrap();

        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/sheet-1/values/Q1%20%232%2F3%3F!A1:append"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_relative_api_base_is_rejected() {
        assert!(ledger("sheets.example.com", "Jasenet").is_err());
    }
}
