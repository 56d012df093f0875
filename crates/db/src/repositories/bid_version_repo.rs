//! Repository for the `bid_versions` table: the versioned estimate store.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::bid_version::{BidVersion, UpdateVersionMeta};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, bid_id, version_number, status, default_margin_pct, \
     materials_total, labor_total, tax_total, margin_total, grand_total, \
     notes, created_at, updated_at";

/// Maintains the append-only version history of a bid. Versions are
/// never deleted.
pub struct BidVersionRepo;

impl BidVersionRepo {
    /// The bid's current version: highest `version_number` among
    /// non-superseded rows. Update recency is deliberately ignored so a
    /// superseded version whose notes were edited later stays excluded.
    ///
    /// Returns `None` only under broken data -- every bid is created
    /// with version 1.
    pub async fn current_for_bid(
        pool: &PgPool,
        bid_id: DbId,
    ) -> Result<Option<BidVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid_versions
             WHERE bid_id = $1 AND status <> 'superseded'
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .fetch_optional(pool)
            .await
    }

    /// All versions for a bid, newest first, for history display.
    pub async fn list_for_bid(pool: &PgPool, bid_id: DbId) -> Result<Vec<BidVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid_versions
             WHERE bid_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .fetch_all(pool)
            .await
    }

    /// Find a specific version by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BidVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bid_versions WHERE id = $1");
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Supersede the current version and insert its successor, cloning
    /// every line item with a fresh identity.
    ///
    /// The whole sequence runs in one transaction, and the supersede is
    /// conditional on the row still being non-superseded, so two
    /// concurrent calls cannot both claim the same predecessor. Returns
    /// `None` when the bid has no current version.
    pub async fn create_new_version(
        pool: &PgPool,
        bid_id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<BidVersion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM bid_versions
             WHERE bid_id = $1 AND status <> 'superseded'
             ORDER BY version_number DESC
             LIMIT 1
             FOR UPDATE"
        );
        let Some(current) = sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let superseded = sqlx::query(
            "UPDATE bid_versions SET status = 'superseded'
             WHERE id = $1 AND status <> 'superseded'",
        )
        .bind(current.id)
        .execute(&mut *tx)
        .await?;
        if superseded.rows_affected() == 0 {
            // Lost a race to another request; the caller can retry.
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO bid_versions
                (bid_id, version_number, default_margin_pct,
                 materials_total, labor_total, tax_total, margin_total, grand_total, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let next = sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .bind(current.version_number + 1)
            .bind(current.default_margin_pct)
            .bind(current.materials_total)
            .bind(current.labor_total)
            .bind(current.tax_total)
            .bind(current.margin_total)
            .bind(current.grand_total)
            .bind(notes)
            .fetch_one(&mut *tx)
            .await?;

        // Clone line items into the new version; identities and
        // timestamps are fresh, everything else carries over.
        sqlx::query(
            "INSERT INTO bid_line_items
                (version_id, bid_id, section, description, quantity, unit,
                 line_total, price_list_item_id, notes, sort_order)
             SELECT $2, bid_id, section, description, quantity, unit,
                    line_total, price_list_item_id, notes, sort_order
             FROM bid_line_items
             WHERE version_id = $1",
        )
        .bind(current.id)
        .bind(next.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(next))
    }

    /// Update notes and/or status of a specific version. The version is
    /// addressed by ID, never implicitly "the current one".
    pub async fn update_meta(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVersionMeta,
    ) -> Result<Option<BidVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE bid_versions SET
                notes = COALESCE($2, notes),
                status = COALESCE($3, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(id)
            .bind(&input.notes)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }
}
