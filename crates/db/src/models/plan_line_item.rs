//! Plan line item models and DTOs.

use ridgeline_core::reconcile::Identified;
use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `plan_line_items` table.
///
/// `field_key` is a stable identifier within a section, consumed by the
/// dynamic form layer; `options` is an opaque structured payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlanLineItem {
    pub id: DbId,
    pub plan_id: DbId,
    pub section: String,
    pub field_key: String,
    pub options: Option<serde_json::Value>,
    pub description: String,
    pub amount: f64,
    pub sort_order: i32,
    pub price_list_item_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One entry of the full-replacement list for `PUT /plans/{id}/line-items`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanItemInput {
    pub id: Option<DbId>,
    pub section: String,
    pub field_key: String,
    pub options: Option<serde_json::Value>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub sort_order: i32,
    pub price_list_item_id: Option<DbId>,
}

impl Identified for PlanItemInput {
    fn id(&self) -> Option<DbId> {
        self.id
    }
}
