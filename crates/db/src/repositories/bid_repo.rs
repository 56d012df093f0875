//! Repository for the `bids` table.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::bid::{Bid, CreateBid, UpdateBid};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, trade, status, client_name, client_email, client_phone, \
     client_address, production_plan_id, default_margin_pct, waste_pct, tax_rate_pct, \
     materials_total, labor_total, tax_total, margin_total, grand_total, \
     created_by, created_at, updated_at";

/// Provides CRUD operations for bids. Bids are never physically
/// deleted; lifecycle changes go through status updates.
pub struct BidRepo;

impl BidRepo {
    /// Insert a new bid together with its version 1, returning the bid.
    ///
    /// Runs in a transaction so a bid can never exist without a current
    /// version.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBid,
        created_by: DbId,
    ) -> Result<Bid, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO bids (trade, client_name, client_email, client_phone, client_address,
                               default_margin_pct, waste_pct, tax_rate_pct, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), COALESCE($7, 0), COALESCE($8, 0), $9)
             RETURNING {COLUMNS}"
        );
        let bid = sqlx::query_as::<_, Bid>(&query)
            .bind(input.trade)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(&input.client_address)
            .bind(input.default_margin_pct)
            .bind(input.waste_pct)
            .bind(input.tax_rate_pct)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO bid_versions (bid_id, version_number, default_margin_pct)
             VALUES ($1, 1, $2)",
        )
        .bind(bid.id)
        .bind(bid.default_margin_pct)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(bid)
    }

    /// Find a bid by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bids WHERE id = $1");
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all bids, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Bid>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bids ORDER BY created_at DESC");
        sqlx::query_as::<_, Bid>(&query).fetch_all(pool).await
    }

    /// Update a bid. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBid,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!(
            "UPDATE bids SET
                status = COALESCE($2, status),
                client_name = COALESCE($3, client_name),
                client_email = COALESCE($4, client_email),
                client_phone = COALESCE($5, client_phone),
                client_address = COALESCE($6, client_address),
                default_margin_pct = COALESCE($7, default_margin_pct),
                waste_pct = COALESCE($8, waste_pct),
                tax_rate_pct = COALESCE($9, tax_rate_pct),
                materials_total = COALESCE($10, materials_total),
                labor_total = COALESCE($11, labor_total),
                tax_total = COALESCE($12, tax_total),
                margin_total = COALESCE($13, margin_total),
                grand_total = COALESCE($14, grand_total)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .bind(input.status)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(&input.client_address)
            .bind(input.default_margin_pct)
            .bind(input.waste_pct)
            .bind(input.tax_rate_pct)
            .bind(input.materials_total)
            .bind(input.labor_total)
            .bind(input.tax_total)
            .bind(input.margin_total)
            .bind(input.grand_total)
            .fetch_optional(pool)
            .await
    }

    /// Set the one-way `production_plan_id` pointer after conversion.
    ///
    /// The `IS NULL` predicate makes the pointer set-once: returns
    /// `false` when the bid was already converted.
    pub async fn link_production_plan(
        pool: &PgPool,
        bid_id: DbId,
        plan_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bids SET production_plan_id = $2
             WHERE id = $1 AND production_plan_id IS NULL",
        )
        .bind(bid_id)
        .bind(plan_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
