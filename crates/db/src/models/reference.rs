//! Small admin-maintained reference tables: tax rates, payment note
//! templates, and start date windows.

use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaxRate {
    pub id: DbId,
    pub region: String,
    pub rate_pct: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct UpsertTaxRate {
    pub region: String,
    pub rate_pct: f64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentNoteTemplate {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct UpsertPaymentNoteTemplate {
    pub title: String,
    pub body: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StartDateWindow {
    pub id: DbId,
    pub label: String,
    pub weeks_out_min: i32,
    pub weeks_out_max: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct UpsertStartDateWindow {
    pub label: String,
    pub weeks_out_min: i32,
    pub weeks_out_max: i32,
    pub is_active: Option<bool>,
}
