//! Repository for the `terms_conditions` table.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::terms::{CreateTerms, TermsConditions};

const COLUMNS: &str = "id, version, content, is_active, created_at, updated_at";

pub struct TermsRepo;

impl TermsRepo {
    /// The terms text embedded into generated PDFs: highest version
    /// among active rows. Correct administration keeps exactly one row
    /// active; the data layer does not enforce it.
    pub async fn active(pool: &PgPool) -> Result<Option<TermsConditions>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM terms_conditions
             WHERE is_active = TRUE
             ORDER BY version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, TermsConditions>(&query)
            .fetch_optional(pool)
            .await
    }

    /// All terms versions, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TermsConditions>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM terms_conditions ORDER BY version DESC");
        sqlx::query_as::<_, TermsConditions>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert the next terms version. When `is_active` is requested the
    /// previously active rows are deactivated in the same transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTerms,
    ) -> Result<TermsConditions, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let activate = input.is_active.unwrap_or(false);
        if activate {
            sqlx::query("UPDATE terms_conditions SET is_active = FALSE WHERE is_active = TRUE")
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "INSERT INTO terms_conditions (version, content, is_active)
             VALUES ((SELECT COALESCE(MAX(version), 0) + 1 FROM terms_conditions), $1, $2)
             RETURNING {COLUMNS}"
        );
        let terms = sqlx::query_as::<_, TermsConditions>(&query)
            .bind(&input.content)
            .bind(activate)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(terms)
    }

    /// Make a specific version the active one, deactivating the rest.
    /// Returns `false` when the version does not exist.
    pub async fn activate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE terms_conditions SET is_active = FALSE WHERE is_active = TRUE")
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE terms_conditions SET is_active = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
