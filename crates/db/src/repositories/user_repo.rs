//! Repository for the `users` table.

use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpdateUser, User};

const COLUMNS: &str =
    "id, email, password_hash, display_name, role, is_active, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with a pre-hashed password.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, display_name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(password_hash)
            .bind(display_name)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lookup for login. Inactive users are excluded so deactivation
    /// revokes access immediately.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND is_active = TRUE");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY display_name");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
