/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     user_id        BIGSERIAL PRIMARY KEY,
///     email          TEXT NOT NULL UNIQUE,
///     password_hash  TEXT NOT NULL,
///     token_version  BIGINT NOT NULL DEFAULT 0,
///     created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `token_version` starts at 0 and only ever increases. Logout increments
/// it, which invalidates every token issued with the old value; no other
/// operation touches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User account record
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id
    pub user_id: i64,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Session invalidation counter
    pub token_version: i64,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Surfaces the unique-constraint violation when the email is taken;
    /// callers map that to a conflict.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING user_id, email, password_hash, token_version, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, token_version, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, token_version, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Reads the current token version for a user
    ///
    /// Returns `None` when the user no longer exists, which the session
    /// check treats as "no token for them is live".
    pub async fn token_version(pool: &PgPool, user_id: i64) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT token_version FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|(v,)| v))
    }

    /// Increments the token version, invalidating all previously issued
    /// tokens for this user
    ///
    /// Returns false when the user does not exist.
    pub async fn bump_token_version(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET token_version = token_version + 1
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by id
    ///
    /// Administrative / test-support operation; cascades to the user's
    /// lists, memberships, and items.
    pub async fn delete(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
        };

        assert_eq!(create_user.email, "test@example.com");
        assert!(create_user.password_hash.starts_with("$argon2id$"));
    }

    // Database operations are covered by the integration tests in
    // sharelist-api/tests/.
}
