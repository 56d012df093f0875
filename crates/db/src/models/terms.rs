//! Terms & conditions models and DTOs.

use ridgeline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `terms_conditions` table. The send pipeline embeds
/// the highest-version active row into generated PDFs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TermsConditions {
    pub id: DbId,
    pub version: i32,
    pub content: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateTerms {
    pub content: String,
    pub is_active: Option<bool>,
}
