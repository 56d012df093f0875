//! Production plan models and DTOs.

use ridgeline_core::status::PlanStatus;
use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `production_plans` table.
///
/// The `signed_*` audit fields are populated exactly once, server-side,
/// at the moment the status transitions to `signed`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductionPlan {
    pub id: DbId,
    pub status: PlanStatus,
    pub has_roof: bool,
    pub has_siding: bool,
    pub has_guttering: bool,
    pub has_windows: bool,
    pub has_small_jobs: bool,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub sale_price: f64,
    pub signed_ip: Option<String>,
    pub signed_user_agent: Option<String>,
    pub signed_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub pdf_url: Option<String>,
    pub cc_account_id: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /plans`.
#[derive(Debug, Deserialize)]
pub struct CreatePlan {
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    #[serde(default)]
    pub has_roof: bool,
    #[serde(default)]
    pub has_siding: bool,
    #[serde(default)]
    pub has_guttering: bool,
    #[serde(default)]
    pub has_windows: bool,
    #[serde(default)]
    pub has_small_jobs: bool,
    pub sale_price: Option<f64>,
    pub cc_account_id: Option<String>,
}

/// DTO for the generic `PUT /plans/{id}` update.
///
/// A `status` of `signed` triggers server-side signature audit capture;
/// updates without that transition never touch the audit fields.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlan {
    pub status: Option<PlanStatus>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub has_roof: Option<bool>,
    pub has_siding: Option<bool>,
    pub has_guttering: Option<bool>,
    pub has_windows: Option<bool>,
    pub has_small_jobs: Option<bool>,
    pub sale_price: Option<f64>,
    pub cc_account_id: Option<String>,
}

/// Signature audit values captured from the signing request.
#[derive(Debug, Clone, Default)]
pub struct SignatureAudit {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
