//! Repository for the `production_plans` table.

use ridgeline_core::convert::PlanDraft;
use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::plan::{CreatePlan, ProductionPlan, SignatureAudit, UpdatePlan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, status, has_roof, has_siding, has_guttering, has_windows, \
     has_small_jobs, client_name, client_email, client_phone, client_address, sale_price, \
     signed_ip, signed_user_agent, signed_at, sent_at, pdf_url, cc_account_id, \
     created_by, created_at, updated_at";

/// Provides CRUD operations for production plans.
pub struct PlanRepo;

impl PlanRepo {
    /// Insert a new plan from client-supplied fields.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlan,
        created_by: DbId,
    ) -> Result<ProductionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO production_plans
                (client_name, client_email, client_phone, client_address,
                 has_roof, has_siding, has_guttering, has_windows, has_small_jobs,
                 sale_price, cc_account_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 0), $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionPlan>(&query)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(&input.client_address)
            .bind(input.has_roof)
            .bind(input.has_siding)
            .bind(input.has_guttering)
            .bind(input.has_windows)
            .bind(input.has_small_jobs)
            .bind(input.sale_price)
            .bind(&input.cc_account_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Insert a plan projected from a bid (the conversion path).
    pub async fn create_from_draft(
        pool: &PgPool,
        draft: &PlanDraft,
        created_by: DbId,
    ) -> Result<ProductionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO production_plans
                (client_name, client_email, client_phone, client_address,
                 has_roof, has_siding, has_guttering, has_windows, has_small_jobs,
                 sale_price, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionPlan>(&query)
            .bind(&draft.client_name)
            .bind(&draft.client_email)
            .bind(&draft.client_phone)
            .bind(&draft.client_address)
            .bind(draft.flags.has_roof)
            .bind(draft.flags.has_siding)
            .bind(draft.flags.has_guttering)
            .bind(draft.flags.has_windows)
            .bind(draft.flags.has_small_jobs)
            .bind(draft.sale_price)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a plan by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductionPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM production_plans WHERE id = $1");
        sqlx::query_as::<_, ProductionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all plans, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductionPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM production_plans ORDER BY created_at DESC");
        sqlx::query_as::<_, ProductionPlan>(&query)
            .fetch_all(pool)
            .await
    }

    /// Generic plan update. Only non-`None` fields in `input` are
    /// applied.
    ///
    /// When `audit` is `Some`, this request is the transition to
    /// `signed` and the signature audit columns are written alongside.
    /// For every other update the audit columns are left untouched, so
    /// an unrelated edit can never blank a legitimate prior record.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlan,
        audit: Option<&SignatureAudit>,
    ) -> Result<Option<ProductionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE production_plans SET
                status = COALESCE($2, status),
                client_name = COALESCE($3, client_name),
                client_email = COALESCE($4, client_email),
                client_phone = COALESCE($5, client_phone),
                client_address = COALESCE($6, client_address),
                has_roof = COALESCE($7, has_roof),
                has_siding = COALESCE($8, has_siding),
                has_guttering = COALESCE($9, has_guttering),
                has_windows = COALESCE($10, has_windows),
                has_small_jobs = COALESCE($11, has_small_jobs),
                sale_price = COALESCE($12, sale_price),
                cc_account_id = COALESCE($13, cc_account_id),
                signed_ip = CASE WHEN $14 THEN $15 ELSE signed_ip END,
                signed_user_agent = CASE WHEN $14 THEN $16 ELSE signed_user_agent END,
                signed_at = CASE WHEN $14 THEN NOW() ELSE signed_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionPlan>(&query)
            .bind(id)
            .bind(input.status)
            .bind(&input.client_name)
            .bind(&input.client_email)
            .bind(&input.client_phone)
            .bind(&input.client_address)
            .bind(input.has_roof)
            .bind(input.has_siding)
            .bind(input.has_guttering)
            .bind(input.has_windows)
            .bind(input.has_small_jobs)
            .bind(input.sale_price)
            .bind(&input.cc_account_id)
            .bind(audit.is_some())
            .bind(audit.and_then(|a| a.ip.as_deref()))
            .bind(audit.and_then(|a| a.user_agent.as_deref()))
            .fetch_optional(pool)
            .await
    }

    /// Mark the plan sent and stamp `sent_at`, optionally recording the
    /// uploaded PDF's URL.
    ///
    /// A signed plan never transitions again, so the update refuses to
    /// touch a `signed` row and returns `None`.
    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
        pdf_url: Option<&str>,
    ) -> Result<Option<ProductionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE production_plans SET
                status = 'sent',
                sent_at = NOW(),
                pdf_url = COALESCE($2, pdf_url)
             WHERE id = $1 AND status <> 'signed'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionPlan>(&query)
            .bind(id)
            .bind(pdf_url)
            .fetch_optional(pool)
            .await
    }
}
