//! Repository for the small reference tables: tax rates, payment note
//! templates, and start date windows.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::reference::{
    PaymentNoteTemplate, StartDateWindow, TaxRate, UpsertPaymentNoteTemplate,
    UpsertStartDateWindow, UpsertTaxRate,
};

pub struct ReferenceRepo;

impl ReferenceRepo {
    // --- Tax rates ---

    pub async fn list_tax_rates(pool: &PgPool) -> Result<Vec<TaxRate>, sqlx::Error> {
        sqlx::query_as::<_, TaxRate>(
            "SELECT id, region, rate_pct, is_active, created_at, updated_at
             FROM tax_rates ORDER BY region",
        )
        .fetch_all(pool)
        .await
    }

    /// Insert or update the rate for a region (regions are unique).
    pub async fn upsert_tax_rate(
        pool: &PgPool,
        input: &UpsertTaxRate,
    ) -> Result<TaxRate, sqlx::Error> {
        sqlx::query_as::<_, TaxRate>(
            "INSERT INTO tax_rates (region, rate_pct, is_active)
             VALUES ($1, $2, COALESCE($3, TRUE))
             ON CONFLICT ON CONSTRAINT uq_tax_rates_region
             DO UPDATE SET rate_pct = EXCLUDED.rate_pct, is_active = EXCLUDED.is_active
             RETURNING id, region, rate_pct, is_active, created_at, updated_at",
        )
        .bind(&input.region)
        .bind(input.rate_pct)
        .bind(input.is_active)
        .fetch_one(pool)
        .await
    }

    // --- Payment note templates ---

    pub async fn list_payment_notes(pool: &PgPool) -> Result<Vec<PaymentNoteTemplate>, sqlx::Error> {
        sqlx::query_as::<_, PaymentNoteTemplate>(
            "SELECT id, title, body, sort_order, created_at, updated_at
             FROM payment_note_templates ORDER BY sort_order, id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create_payment_note(
        pool: &PgPool,
        input: &UpsertPaymentNoteTemplate,
    ) -> Result<PaymentNoteTemplate, sqlx::Error> {
        sqlx::query_as::<_, PaymentNoteTemplate>(
            "INSERT INTO payment_note_templates (title, body, sort_order)
             VALUES ($1, $2, COALESCE($3, 0))
             RETURNING id, title, body, sort_order, created_at, updated_at",
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.sort_order)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_payment_note(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payment_note_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Start date windows ---

    pub async fn list_start_windows(pool: &PgPool) -> Result<Vec<StartDateWindow>, sqlx::Error> {
        sqlx::query_as::<_, StartDateWindow>(
            "SELECT id, label, weeks_out_min, weeks_out_max, is_active, created_at, updated_at
             FROM start_date_windows ORDER BY weeks_out_min",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create_start_window(
        pool: &PgPool,
        input: &UpsertStartDateWindow,
    ) -> Result<StartDateWindow, sqlx::Error> {
        sqlx::query_as::<_, StartDateWindow>(
            "INSERT INTO start_date_windows (label, weeks_out_min, weeks_out_max, is_active)
             VALUES ($1, $2, $3, COALESCE($4, TRUE))
             RETURNING id, label, weeks_out_min, weeks_out_max, is_active, created_at, updated_at",
        )
        .bind(&input.label)
        .bind(input.weeks_out_min)
        .bind(input.weeks_out_max)
        .bind(input.is_active)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_start_window(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM start_date_windows WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
