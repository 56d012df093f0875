//! HTTP clients for the two external SaaS platforms:
//! Contractors Cloud (CRM/project management) and Hover (exterior
//! measurement capture).

pub mod contractors_cloud;
pub mod hover;

/// Errors from the external API layer, shared by both clients.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream API returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The integration is not configured (missing credentials).
    #[error("Integration not configured: {0}")]
    NotConfigured(&'static str),

    /// No usable OAuth token is available; the user must re-authorize.
    #[error("No valid token: {0}")]
    NoToken(String),
}
