//! Bid line item models and DTOs.

use ridgeline_core::reconcile::Identified;
use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bid_line_items` table. `bid_id` is denormalized from
/// the owning version's bid.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BidLineItem {
    pub id: DbId,
    pub version_id: DbId,
    pub bid_id: DbId,
    pub section: String,
    pub description: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub line_total: f64,
    pub price_list_item_id: Option<DbId>,
    pub notes: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One entry of the full-replacement list submitted to
/// `PUT /bids/{id}/line-items`. An entry carrying an `id` that matches
/// a persisted row updates it; anything else inserts a new row.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    pub id: Option<DbId>,
    pub section: String,
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    #[serde(default)]
    pub line_total: f64,
    pub price_list_item_id: Option<DbId>,
    pub notes: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_quantity() -> f64 {
    1.0
}

impl Identified for LineItemInput {
    fn id(&self) -> Option<DbId> {
        self.id
    }
}
