//! OAuth client for the Hover exterior-measurement API.
//!
//! Hover uses a standard authorization-code flow: the UI sends the user
//! to [`HoverClient::authorize_url`], Hover redirects back with a code
//! that [`HoverClient::exchange_code`] turns into a token set, and
//! expired access tokens are renewed with [`HoverClient::refresh`].
//! Token persistence lives with the caller; this client is stateless.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::CrmError;

/// Configuration for the Hover client.
#[derive(Debug, Clone)]
pub struct HoverConfig {
    /// Base API URL, e.g. `https://hover.example`.
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered with Hover for the OAuth callback.
    pub redirect_uri: String,
}

impl HoverConfig {
    /// Load from `HOVER_BASE_URL` / `HOVER_CLIENT_ID` /
    /// `HOVER_CLIENT_SECRET` / `HOVER_REDIRECT_URI`. Returns `None`
    /// when the integration is not configured.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            base_url: std::env::var("HOVER_BASE_URL").ok()?,
            client_id: std::env::var("HOVER_CLIENT_ID").ok()?,
            client_secret: std::env::var("HOVER_CLIENT_SECRET").ok()?,
            redirect_uri: std::env::var("HOVER_REDIRECT_URI").ok()?,
        })
    }
}

/// An issued token set with its computed expiry instant.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Whether the access token should still be usable.
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now() + Duration::seconds(60)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

/// A job visible to the authorized Hover account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverJob {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobSearchResponse {
    #[serde(default)]
    results: Vec<HoverJob>,
}

/// HTTP client for Hover.
pub struct HoverClient {
    client: reqwest::Client,
    config: HoverConfig,
}

impl HoverClient {
    pub fn new(config: HoverConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The URL to send the user to for authorization.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&state={}",
            self.config.base_url, self.config.client_id, self.config.redirect_uri, state
        )
    }

    /// Exchange the callback code for a token set.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, CrmError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ])
        .await
    }

    /// Renew an expired access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, CrmError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenSet, CrmError> {
        let response = self
            .client
            .post(format!("{}/oauth/token", self.config.base_url))
            .form(form)
            .send()
            .await?;
        let token: TokenResponse = parse_response(response).await?;
        Ok(TokenSet {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    /// Search jobs by free-text query.
    pub async fn search_jobs(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Vec<HoverJob>, CrmError> {
        let response = self
            .client
            .get(format!("{}/api/v2/jobs", self.config.base_url))
            .bearer_auth(access_token)
            .query(&[("search", query)])
            .send()
            .await?;
        let body: JobSearchResponse = parse_response(response).await?;
        Ok(body.results)
    }

    /// Fetch the structured measurement artifact for a model. The
    /// payload shape is Hover's; it is passed through opaquely.
    pub async fn fetch_measurements(
        &self,
        access_token: &str,
        model_id: i64,
    ) -> Result<serde_json::Value, CrmError> {
        let response = self
            .client
            .get(format!(
                "{}/api/v2/models/{}/measurements",
                self.config.base_url, model_id
            ))
            .bearer_auth(access_token)
            .send()
            .await?;
        parse_response(response).await
    }
}

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
