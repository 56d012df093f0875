//! Bid version models and DTOs.

use ridgeline_core::status::VersionStatus;
use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bid_versions` table.
///
/// At most one version per bid is non-superseded ("the current
/// version"); it is selected by the status filter plus the highest
/// `version_number`, never by update recency.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BidVersion {
    pub id: DbId,
    pub bid_id: DbId,
    pub version_number: i32,
    pub status: VersionStatus,
    pub default_margin_pct: f64,
    pub materials_total: f64,
    pub labor_total: f64,
    pub tax_total: f64,
    pub margin_total: f64,
    pub grand_total: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /bids/{id}/versions`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVersion {
    pub notes: Option<String>,
}

/// DTO for `PUT /bids/{id}/versions/{version_id}`.
///
/// Only notes and status are mutable on an existing version; pricing is
/// changed by reconciling line items or cutting a new version.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVersionMeta {
    pub notes: Option<String>,
    pub status: Option<VersionStatus>,
}
