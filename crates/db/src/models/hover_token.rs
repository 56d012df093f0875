//! Persisted Hover OAuth token rows.

use ridgeline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `hover_tokens` table. The newest row wins; concurrent
/// refreshes may insert competing rows, which Hover tolerates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HoverToken {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
