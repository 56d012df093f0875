//! Repository for the `bid_line_items` table.

use ridgeline_core::reconcile;
use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::bid_line_item::{BidLineItem, LineItemInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, version_id, bid_id, section, description, quantity, unit, \
     line_total, price_list_item_id, notes, sort_order, created_at, updated_at";

/// Line items are owned by a bid version and only mutated through
/// [`BidLineItemRepo::reconcile`].
pub struct BidLineItemRepo;

impl BidLineItemRepo {
    /// All line items of a version, ordered by (section, sort_order).
    pub async fn list_for_version(
        pool: &PgPool,
        version_id: DbId,
    ) -> Result<Vec<BidLineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid_line_items
             WHERE version_id = $1
             ORDER BY section, sort_order"
        );
        sqlx::query_as::<_, BidLineItem>(&query)
            .bind(version_id)
            .fetch_all(pool)
            .await
    }

    /// Converge the version's persisted line items to exactly match
    /// `incoming` (full-replacement semantics).
    ///
    /// Deletes are executed before updates and inserts; see
    /// `ridgeline_core::reconcile` for why the ordering matters. The
    /// phases are not wrapped in a transaction.
    pub async fn reconcile(
        pool: &PgPool,
        version_id: DbId,
        bid_id: DbId,
        incoming: Vec<LineItemInput>,
    ) -> Result<Vec<BidLineItem>, sqlx::Error> {
        let existing: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM bid_line_items WHERE version_id = $1 ORDER BY id")
                .bind(version_id)
                .fetch_all(pool)
                .await?;

        let plan = reconcile::plan(&existing, incoming);

        if !plan.delete.is_empty() {
            sqlx::query("DELETE FROM bid_line_items WHERE version_id = $1 AND id = ANY($2)")
                .bind(version_id)
                .bind(&plan.delete)
                .execute(pool)
                .await?;
        }

        for (id, item) in &plan.update {
            sqlx::query(
                "UPDATE bid_line_items SET
                    section = $2, description = $3, quantity = $4, unit = $5,
                    line_total = $6, price_list_item_id = $7, notes = $8, sort_order = $9
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&item.section)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(&item.unit)
            .bind(item.line_total)
            .bind(item.price_list_item_id)
            .bind(&item.notes)
            .bind(item.sort_order)
            .execute(pool)
            .await?;
        }

        for item in &plan.insert {
            sqlx::query(
                "INSERT INTO bid_line_items
                    (version_id, bid_id, section, description, quantity, unit,
                     line_total, price_list_item_id, notes, sort_order)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(version_id)
            .bind(bid_id)
            .bind(&item.section)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(&item.unit)
            .bind(item.line_total)
            .bind(item.price_list_item_id)
            .bind(&item.notes)
            .bind(item.sort_order)
            .execute(pool)
            .await?;
        }

        Self::list_for_version(pool, version_id).await
    }
}
