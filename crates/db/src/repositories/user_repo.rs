//! Repository for the `users` table.

use sqlx::PgPool;
use vitrine_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, username, email, first_name, last_name, created_at";

/// Provides CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Create a new user. Empty strings are stored for missing name parts.
    pub async fn create(pool: &PgPool, dto: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&dto.username)
            .bind(&dto.email)
            .bind(dto.first_name.as_deref().unwrap_or(""))
            .bind(dto.last_name.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// Find a user by their username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Refresh profile fields on login. `None` name parts keep their current
    /// values.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users \
             SET email = $2, \
                 first_name = COALESCE($3, first_name), \
                 last_name = COALESCE($4, last_name) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(email)
            .bind(first_name)
            .bind(last_name)
            .fetch_optional(pool)
            .await
    }
}
