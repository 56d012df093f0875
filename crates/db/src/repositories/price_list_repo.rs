//! Repository for the `price_list_items` table.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::price_list::{CreatePriceListItem, PriceListItem, UpdatePriceListItem};

const COLUMNS: &str = "id, category, name, unit, unit_price, is_active, created_at, updated_at";

pub struct PriceListRepo;

impl PriceListRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePriceListItem,
    ) -> Result<PriceListItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO price_list_items (category, name, unit, unit_price, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(&input.category)
            .bind(&input.name)
            .bind(&input.unit)
            .bind(input.unit_price)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PriceListItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM price_list_items WHERE id = $1");
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List catalog entries, optionally restricted to active rows,
    /// grouped for display by (category, name).
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<PriceListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_list_items
             WHERE ($1 = FALSE OR is_active = TRUE)
             ORDER BY category, name"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePriceListItem,
    ) -> Result<Option<PriceListItem>, sqlx::Error> {
        let query = format!(
            "UPDATE price_list_items SET
                category = COALESCE($2, category),
                name = COALESCE($3, name),
                unit = COALESCE($4, unit),
                unit_price = COALESCE($5, unit_price),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.name)
            .bind(&input.unit)
            .bind(input.unit_price)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Catalog entries are deactivated rather than deleted so historic
    /// line items keep their link.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE price_list_items SET is_active = FALSE WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
