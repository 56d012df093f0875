use std::sync::Arc;

use ridgeline_crm::contractors_cloud::ContractorsCloudClient;
use ridgeline_crm::hover::HoverClient;
use ridgeline_documents::email::MailTransport;
use ridgeline_documents::pdf::PdfRenderer;
use ridgeline_documents::storage::ArtifactStore;

use crate::config::ServerConfig;

/// External service clients, constructed once at startup from the
/// environment and injected everywhere through [`AppState`]. Each is
/// optional: an unconfigured integration simply fails the operations
/// that need it.
pub struct Services {
    pub renderer: Option<Arc<dyn PdfRenderer>>,
    pub artifacts: Option<Arc<ArtifactStore>>,
    pub mailer: Option<Arc<dyn MailTransport>>,
    pub contractors_cloud: Option<Arc<ContractorsCloudClient>>,
    pub hover: Option<Arc<HoverClient>>,
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ridgeline_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// External service clients.
    pub services: Arc<Services>,
}
