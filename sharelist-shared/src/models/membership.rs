/// Membership model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     list_id     BIGINT NOT NULL REFERENCES lists(list_id) ON DELETE CASCADE,
///     user_id     BIGINT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (list_id, user_id)
/// );
/// ```
///
/// A pair appears at most once; the composite primary key, not application
/// pre-checks, is the final arbiter under concurrent duplicate adds.
/// Membership is re-creatable: removing a user and adding them back works.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Membership record linking a user to a list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// List id
    pub list_id: i64,

    /// User id
    pub user_id: i64,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// A (list_id, member email) pair from the membership join
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberEmail {
    pub list_id: i64,
    pub email: String,
}

impl Membership {
    /// Adds a user to a list
    ///
    /// # Errors
    ///
    /// A duplicate pair violates the composite primary key; callers map
    /// that to a conflict.
    pub async fn create(pool: &PgPool, list_id: i64, user_id: i64) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (list_id, user_id)
            VALUES ($1, $2)
            RETURNING list_id, user_id, created_at
            "#,
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Removes a user from a list
    ///
    /// Returns false when no such membership existed.
    pub async fn delete(pool: &PgPool, list_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE list_id = $1 AND user_id = $2")
            .bind(list_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetches member emails for a set of lists
    ///
    /// Returns flat (list_id, email) rows; callers group them per list.
    pub async fn member_emails(
        pool: &PgPool,
        list_ids: &[i64],
    ) -> Result<Vec<MemberEmail>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MemberEmail>(
            r#"
            SELECT m.list_id, u.email
            FROM memberships m
            JOIN users u ON u.user_id = m.user_id
            WHERE m.list_id = ANY($1)
            ORDER BY m.list_id, u.email
            "#,
        )
        .bind(list_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
