//! REST client for the Contractors Cloud CRM API.
//!
//! Wraps account search, project listing, and file upload using
//! [`reqwest`]. The access token is process-wide shared state refreshed
//! lazily on expiry; concurrent refreshes are not synchronized against
//! each other -- the API tolerates either token being valid momentarily.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::CrmError;

/// Bounded parallelism for per-account job-number enrichment.
const ENRICH_CONCURRENCY: usize = 4;

/// Refresh the token this long before its reported expiry.
const TOKEN_EXPIRY_SLACK_SECS: i64 = 60;

/// Configuration for the Contractors Cloud client.
#[derive(Debug, Clone)]
pub struct CcConfig {
    /// Base API URL, e.g. `https://api.contractorscloud.example`.
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl CcConfig {
    /// Load from `CC_BASE_URL` / `CC_CLIENT_ID` / `CC_CLIENT_SECRET`.
    /// Returns `None` when the integration is not configured.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            base_url: std::env::var("CC_BASE_URL").ok()?,
            client_id: std::env::var("CC_CLIENT_ID").ok()?,
            client_secret: std::env::var("CC_CLIENT_SECRET").ok()?,
        })
    }
}

/// An account row from Contractors Cloud search results, enriched with
/// a job number where one could be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CcAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub job_number: Option<String>,
}

/// A project belonging to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CcProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// HTTP client for Contractors Cloud.
pub struct ContractorsCloudClient {
    client: reqwest::Client,
    config: CcConfig,
    token: Arc<Mutex<Option<CachedToken>>>,
    job_number_pattern: Regex,
}

impl ContractorsCloudClient {
    pub fn new(config: CcConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token: Arc::new(Mutex::new(None)),
            job_number_pattern: Regex::new(r"^\d{6}$").expect("static pattern"),
        }
    }

    /// Return a valid access token, exchanging client credentials when
    /// the cached one is missing or about to expire.
    async fn access_token(&self) -> Result<String, CrmError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Utc::now() + Duration::seconds(TOKEN_EXPIRY_SLACK_SECS) {
                return Ok(cached.token.clone());
            }
        }

        let response = self
            .client
            .post(format!("{}/oauth/token", self.config.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = Self::parse_response(response).await?;

        let cached = CachedToken {
            token: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        };
        *guard = Some(cached);
        Ok(token.access_token)
    }

    /// Search accounts by free-text query, or by job number when the
    /// query is exactly six digits.
    pub async fn search_accounts(&self, query: &str) -> Result<Vec<CcAccount>, CrmError> {
        let token = self.access_token().await?;
        let param = if self.job_number_pattern.is_match(query.trim()) {
            ("job_number", query.trim())
        } else {
            ("q", query)
        };

        let response = self
            .client
            .get(format!("{}/v1/accounts", self.config.base_url))
            .bearer_auth(&token)
            .query(&[param])
            .send()
            .await?;
        let accounts: Vec<CcAccount> = Self::parse_response(response).await?;

        self.enrich_job_numbers(accounts).await
    }

    /// Look up the job number for each matched account, with bounded
    /// parallelism over the result set. Lookup failures leave the
    /// account un-enriched rather than failing the whole search.
    async fn enrich_job_numbers(
        &self,
        accounts: Vec<CcAccount>,
    ) -> Result<Vec<CcAccount>, CrmError> {
        let token = self.access_token().await?;
        let enriched = stream::iter(accounts)
            .map(|mut account| {
                let token = token.clone();
                async move {
                    if account.job_number.is_none() {
                        match self.fetch_job_number(&token, &account.id).await {
                            Ok(number) => account.job_number = number,
                            Err(err) => {
                                tracing::warn!(account_id = %account.id, error = %err,
                                    "Job number lookup failed");
                            }
                        }
                    }
                    account
                }
            })
            .buffer_unordered(ENRICH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
        Ok(enriched)
    }

    async fn fetch_job_number(
        &self,
        token: &str,
        account_id: &str,
    ) -> Result<Option<String>, CrmError> {
        #[derive(Deserialize)]
        struct JobNumber {
            #[serde(default)]
            job_number: Option<String>,
        }

        let response = self
            .client
            .get(format!(
                "{}/v1/accounts/{}/job-number",
                self.config.base_url, account_id
            ))
            .bearer_auth(token)
            .send()
            .await?;
        let body: JobNumber = Self::parse_response(response).await?;
        Ok(body.job_number)
    }

    /// List projects for an account.
    pub async fn list_projects(&self, account_id: &str) -> Result<Vec<CcProject>, CrmError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(format!(
                "{}/v1/accounts/{}/projects",
                self.config.base_url, account_id
            ))
            .bearer_auth(&token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Upload a file into a project's file library with a
    /// type/description classification and a customer-visibility flag.
    pub async fn upload_project_file(
        &self,
        project_id: &str,
        filename: &str,
        bytes: Vec<u8>,
        file_type: &str,
        description: &str,
        visible_to_customer: bool,
    ) -> Result<(), CrmError> {
        let token = self.access_token().await?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("type", file_type.to_string())
            .text("description", description.to_string())
            .text("visible_to_customer", visible_to_customer.to_string());

        let response = self
            .client
            .post(format!(
                "{}/v1/projects/{}/files",
                self.config.base_url, project_id
            ))
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Deserialize a 2xx response body, or surface the status and raw
    /// body as an [`CrmError::ApiError`].
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CrmError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CrmError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<(), CrmError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CrmError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }
}
