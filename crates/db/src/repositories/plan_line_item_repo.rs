//! Repository for the `plan_line_items` table.

use ridgeline_core::convert::PlanItemDraft;
use ridgeline_core::reconcile;
use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::plan_line_item::{PlanItemInput, PlanLineItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, plan_id, section, field_key, options, description, amount, \
     sort_order, price_list_item_id, created_at, updated_at";

/// Line items owned by a production plan. Mutated through
/// [`PlanLineItemRepo::reconcile`] or bulk-inserted during conversion.
pub struct PlanLineItemRepo;

impl PlanLineItemRepo {
    /// All line items of a plan, ordered by sort_order.
    pub async fn list_for_plan(
        pool: &PgPool,
        plan_id: DbId,
    ) -> Result<Vec<PlanLineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM plan_line_items
             WHERE plan_id = $1
             ORDER BY sort_order"
        );
        sqlx::query_as::<_, PlanLineItem>(&query)
            .bind(plan_id)
            .fetch_all(pool)
            .await
    }

    /// Bulk-insert the drafts produced by bid-to-plan conversion. A
    /// no-op for an empty slice.
    pub async fn insert_drafts(
        pool: &PgPool,
        plan_id: DbId,
        drafts: &[PlanItemDraft],
    ) -> Result<(), sqlx::Error> {
        for draft in drafts {
            sqlx::query(
                "INSERT INTO plan_line_items
                    (plan_id, section, field_key, options, description, amount,
                     sort_order, price_list_item_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(plan_id)
            .bind(draft.section)
            .bind(&draft.field_key)
            .bind(&draft.options)
            .bind(&draft.description)
            .bind(draft.amount)
            .bind(draft.sort_order)
            .bind(draft.price_list_item_id)
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Converge the plan's persisted line items to exactly match
    /// `incoming`. Deletes run first; see `ridgeline_core::reconcile`.
    pub async fn reconcile(
        pool: &PgPool,
        plan_id: DbId,
        incoming: Vec<PlanItemInput>,
    ) -> Result<Vec<PlanLineItem>, sqlx::Error> {
        let existing: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM plan_line_items WHERE plan_id = $1 ORDER BY id")
                .bind(plan_id)
                .fetch_all(pool)
                .await?;

        let plan = reconcile::plan(&existing, incoming);

        if !plan.delete.is_empty() {
            sqlx::query("DELETE FROM plan_line_items WHERE plan_id = $1 AND id = ANY($2)")
                .bind(plan_id)
                .bind(&plan.delete)
                .execute(pool)
                .await?;
        }

        for (id, item) in &plan.update {
            sqlx::query(
                "UPDATE plan_line_items SET
                    section = $2, field_key = $3, options = $4, description = $5,
                    amount = $6, sort_order = $7, price_list_item_id = $8
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&item.section)
            .bind(&item.field_key)
            .bind(&item.options)
            .bind(&item.description)
            .bind(item.amount)
            .bind(item.sort_order)
            .bind(item.price_list_item_id)
            .execute(pool)
            .await?;
        }

        for item in &plan.insert {
            sqlx::query(
                "INSERT INTO plan_line_items
                    (plan_id, section, field_key, options, description, amount,
                     sort_order, price_list_item_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(plan_id)
            .bind(&item.section)
            .bind(&item.field_key)
            .bind(&item.options)
            .bind(&item.description)
            .bind(item.amount)
            .bind(item.sort_order)
            .bind(item.price_list_item_id)
            .execute(pool)
            .await?;
        }

        Self::list_for_plan(pool, plan_id).await
    }
}
