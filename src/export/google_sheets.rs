// src/export/google_sheets.rs
//! Google Sheets export through a service account

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{error, info};

use super::TabularSink;
use crate::core::config_manager::SheetsConfig;
use crate::core::FsOps;
use crate::error::ProspectorError;
use crate::utils::quote_sheet_title;

const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a service account key file this sink needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Credentials file is not a service account key")
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(key: &ServiceAccountKey) -> Self {
        let now = Utc::now();
        Self {
            iss: key.client_email.clone(),
            scope: SCOPES.to_string(),
            aud: key.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Spreadsheet {
    #[serde(default)]
    spreadsheet_id: String,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Spreadsheet addressed by name, opened or created on demand.
///
/// Every export clears the first worksheet before writing.
pub struct GoogleSheetSink {
    client: Client,
    config: SheetsConfig,
    sheet_name: String,
    credentials_path: PathBuf,
}

impl GoogleSheetSink {
    pub fn new(
        sheet_name: &str,
        credentials_path: PathBuf,
        config: SheetsConfig,
    ) -> crate::error::Result<Self> {
        if sheet_name.trim().is_empty() {
            return Err(ProspectorError::sink("sheet name is empty"));
        }
        if !credentials_path.is_file() {
            return Err(ProspectorError::sink(format!(
                "credentials file not found: {}",
                credentials_path.display()
            )));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ProspectorError::sink)?;

        Ok(Self {
            client,
            config,
            sheet_name: sheet_name.trim().to_string(),
            credentials_path,
        })
    }

    async fn sync_table(&self, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let content = FsOps::read_file_safe(&self.credentials_path).await?;
        let key = ServiceAccountKey::from_json(&content)?;
        let token = self.access_token(&key).await?;

        let spreadsheet_id = match self.find_spreadsheet(&token).await? {
            Some(id) => {
                info!("Opened spreadsheet '{}' ({})", self.sheet_name, id);
                id
            }
            None => {
                info!("Spreadsheet '{}' not found, creating it", self.sheet_name);
                self.create_spreadsheet(&token).await?
            }
        };

        let title = self.first_sheet_title(&token, &spreadsheet_id).await?;
        let range = quote_sheet_title(&title);

        self.clear_range(&token, &spreadsheet_id, &range).await?;
        self.write_values(&token, &spreadsheet_id, &range, header, rows)
            .await
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String> {
        let assertion = sign_assertion(key)?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to request access token")?;

        let token: TokenResponse = check_status(response, "token exchange")
            .await?
            .json()
            .await
            .context("Failed to parse token response")?;

        Ok(token.access_token)
    }

    async fn find_spreadsheet(&self, token: &str) -> Result<Option<String>> {
        let url = endpoint(&self.config.drive_url, &["files"])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("q", drive_query(&self.sheet_name).as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
            ])
            .send()
            .await
            .context("Failed to search spreadsheets")?;

        let list: DriveFileList = check_status(response, "spreadsheet search")
            .await?
            .json()
            .await
            .context("Failed to parse spreadsheet search response")?;

        Ok(list.files.into_iter().next().map(|file| file.id))
    }

    async fn create_spreadsheet(&self, token: &str) -> Result<String> {
        let url = endpoint(&self.config.api_url, &["spreadsheets"])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "properties": { "title": self.sheet_name } }))
            .send()
            .await
            .context("Failed to create spreadsheet")?;

        let created: Spreadsheet = check_status(response, "spreadsheet creation")
            .await?
            .json()
            .await
            .context("Failed to parse created spreadsheet")?;

        if created.spreadsheet_id.is_empty() {
            anyhow::bail!("Spreadsheet creation returned no id");
        }
        Ok(created.spreadsheet_id)
    }

    async fn first_sheet_title(&self, token: &str, spreadsheet_id: &str) -> Result<String> {
        let url = endpoint(&self.config.api_url, &["spreadsheets", spreadsheet_id])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await
            .context("Failed to read spreadsheet")?;

        let spreadsheet: Spreadsheet = check_status(response, "spreadsheet lookup")
            .await?
            .json()
            .await
            .context("Failed to parse spreadsheet")?;

        spreadsheet
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .context("Spreadsheet has no worksheet")
    }

    async fn clear_range(&self, token: &str, spreadsheet_id: &str, range: &str) -> Result<()> {
        let clear = format!("{}:clear", range);
        let url = endpoint(
            &self.config.api_url,
            &["spreadsheets", spreadsheet_id, "values", &clear],
        )?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await
            .context("Failed to clear worksheet")?;

        check_status(response, "worksheet clear").await?;
        Ok(())
    }

    async fn write_values(
        &self,
        token: &str,
        spreadsheet_id: &str,
        range: &str,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> Result<()> {
        let start = format!("{}!A1", range);
        let url = endpoint(
            &self.config.api_url,
            &["spreadsheets", spreadsheet_id, "values", &start],
        )?;

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&values_payload(&start, header, rows))
            .send()
            .await
            .context("Failed to write worksheet values")?;

        check_status(response, "worksheet update").await?;
        Ok(())
    }
}

impl TabularSink for GoogleSheetSink {
    fn target(&self) -> String {
        format!("Google Sheet '{}'", self.sheet_name)
    }

    async fn write_table(&mut self, header: &[&str], rows: &[Vec<String>]) -> crate::error::Result<()> {
        self.sync_table(header, rows)
            .await
            .map_err(|e| ProspectorError::sink(format!("{:#}", e)))?;

        info!("Results saved to Google Sheet: {}", self.sheet_name);
        Ok(())
    }
}

async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    error!("Google API error during {} {}: {}", operation, status, error_text);
    anyhow::bail!("Google API returned {} during {}: {}", status, operation, error_text)
}

/// Signed JWT assertion exchanged for an OAuth access token
pub fn sign_assertion(key: &ServiceAccountKey) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("Invalid private key in credentials file")?;

    encode(
        &Header::new(Algorithm::RS256),
        &TokenClaims::new(key),
        &encoding_key,
    )
    .context("Failed to sign token assertion")
}

/// Drive search query matching a spreadsheet by exact name
pub fn drive_query(sheet_name: &str) -> String {
    let escaped = sheet_name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME
    )
}

/// Body of a `values.update` call: header first, one row per record
pub fn values_payload(range: &str, header: &[&str], rows: &[Vec<String>]) -> Value {
    let mut values: Vec<Value> = Vec::with_capacity(rows.len() + 1);
    values.push(json!(header));
    values.extend(rows.iter().map(|row| json!(row)));

    json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": values,
    })
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid API URL: {}", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("API URL cannot have a path: {}", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
