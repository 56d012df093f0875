//! Price list catalog models and DTOs.

use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `price_list_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceListItem {
    pub id: DbId,
    pub category: String,
    pub name: String,
    pub unit: Option<String>,
    pub unit_price: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePriceListItem {
    pub category: String,
    pub name: String,
    pub unit: Option<String>,
    pub unit_price: f64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePriceListItem {
    pub category: Option<String>,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub is_active: Option<bool>,
}
