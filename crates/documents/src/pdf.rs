//! PDF rendering via an external render service.
//!
//! The renderer is treated as a pure function: structured document in,
//! byte buffer out. [`PdfRenderer`] is a trait so tests can substitute
//! a stub without a network.

use async_trait::async_trait;
use serde::Serialize;

/// Errors from the rendering layer.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Render service error ({status}): {body}")]
    Service { status: u16, body: String },

    #[error("PDF rendering not configured: set PDF_RENDER_URL")]
    NotConfigured,
}

/// Which document kind is being rendered; drives the template used by
/// the render service.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Bid,
    ProductionPlan,
}

/// One printable row of the document body.
#[derive(Debug, Serialize)]
pub struct DocumentRow {
    pub section: String,
    pub description: String,
    pub amount: f64,
}

/// The structured document handed to the render service.
#[derive(Debug, Serialize)]
pub struct DocumentPayload {
    pub kind: DocumentKind,
    pub title: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub rows: Vec<DocumentRow>,
    pub total: f64,
    /// Terms & conditions text appended to plan documents.
    pub terms: Option<String>,
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Render the document to PDF bytes.
    async fn render(&self, document: &DocumentPayload) -> Result<Vec<u8>, PdfError>;
}

/// Renderer backed by an HTTP render service that accepts the document
/// JSON and responds with `application/pdf` bytes.
pub struct HttpPdfRenderer {
    client: reqwest::Client,
    render_url: String,
}

impl HttpPdfRenderer {
    pub fn new(render_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            render_url,
        }
    }

    /// Build from `PDF_RENDER_URL`. Returns `None` when unset.
    pub fn from_env() -> Option<Self> {
        std::env::var("PDF_RENDER_URL").ok().map(Self::new)
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(&self, document: &DocumentPayload) -> Result<Vec<u8>, PdfError> {
        let response = self
            .client
            .post(&self.render_url)
            .json(document)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PdfError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
