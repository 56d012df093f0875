//! Bid entity models and DTOs.

use ridgeline_core::status::BidStatus;
use ridgeline_core::trade::Trade;
use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bids` table.
///
/// Bids are never physically deleted; their lifecycle is expressed
/// through [`BidStatus`] transitions only. `production_plan_id` is a
/// set-once pointer populated by the bid-to-plan conversion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bid {
    pub id: DbId,
    pub trade: Trade,
    pub status: BidStatus,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub production_plan_id: Option<DbId>,
    pub default_margin_pct: f64,
    pub waste_pct: f64,
    pub tax_rate_pct: f64,
    pub materials_total: f64,
    pub labor_total: f64,
    pub tax_total: f64,
    pub margin_total: f64,
    pub grand_total: f64,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /bids`. Creating a bid also creates version 1.
#[derive(Debug, Deserialize)]
pub struct CreateBid {
    pub trade: Trade,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub default_margin_pct: Option<f64>,
    pub waste_pct: Option<f64>,
    pub tax_rate_pct: Option<f64>,
}

/// DTO for `PUT /bids/{id}`. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBid {
    pub status: Option<BidStatus>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub default_margin_pct: Option<f64>,
    pub waste_pct: Option<f64>,
    pub tax_rate_pct: Option<f64>,
    pub materials_total: Option<f64>,
    pub labor_total: Option<f64>,
    pub tax_total: Option<f64>,
    pub margin_total: Option<f64>,
    pub grand_total: Option<f64>,
}
