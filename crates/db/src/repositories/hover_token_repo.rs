//! Repository for the `hover_tokens` table.

use ridgeline_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::hover_token::HoverToken;

const COLUMNS: &str = "id, access_token, refresh_token, expires_at, created_at";

pub struct HoverTokenRepo;

impl HoverTokenRepo {
    /// The most recently stored token set, if any.
    pub async fn latest(pool: &PgPool) -> Result<Option<HoverToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hover_tokens ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, HoverToken>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Store a freshly issued token set. Refresh races simply insert
    /// competing rows; `latest` picks one of them.
    pub async fn store(
        pool: &PgPool,
        access_token: &str,
        refresh_token: &str,
        expires_at: Timestamp,
    ) -> Result<HoverToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO hover_tokens (access_token, refresh_token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HoverToken>(&query)
            .bind(access_token)
            .bind(refresh_token)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }
}
