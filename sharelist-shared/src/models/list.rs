/// List model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE lists (
///     list_id     BIGSERIAL PRIMARY KEY,
///     title       TEXT NOT NULL,
///     created_by  BIGINT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every list has exactly one creator. Creating a list also inserts the
/// creator's membership row, in the same transaction, so a freshly created
/// list is never observable without its first member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// List record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct List {
    /// Unique list id
    pub list_id: i64,

    /// List title
    pub title: String,

    /// Creator's user id
    pub created_by: i64,

    /// When the list was created
    pub created_at: DateTime<Utc>,
}

/// List row joined with its creator's email
///
/// Used by the read paths, which annotate responses with the creator's
/// identity relative to the caller.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListWithCreator {
    pub list_id: i64,
    pub title: String,
    pub created_by: i64,
    pub creator_email: String,
}

impl List {
    /// Creates a list and its creator membership atomically
    pub async fn create(pool: &PgPool, user_id: i64, title: &str) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let list = sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (title, created_by)
            VALUES ($1, $2)
            RETURNING list_id, title, created_by, created_at
            "#,
        )
        .bind(title)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO memberships (list_id, user_id) VALUES ($1, $2)")
            .bind(list.list_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(list)
    }

    /// Finds a list by id
    pub async fn find_by_id(pool: &PgPool, list_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, List>(
            r#"
            SELECT list_id, title, created_by, created_at
            FROM lists
            WHERE list_id = $1
            "#,
        )
        .bind(list_id)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Fetches all lists joined with their creator email
    pub async fn fetch_all_with_creator(pool: &PgPool) -> Result<Vec<ListWithCreator>, sqlx::Error> {
        let lists = sqlx::query_as::<_, ListWithCreator>(
            r#"
            SELECT l.list_id, l.title, l.created_by, u.email AS creator_email
            FROM lists l
            JOIN users u ON u.user_id = l.created_by
            ORDER BY l.list_id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(lists)
    }

    /// Fetches one list joined with its creator email
    pub async fn fetch_one_with_creator(
        pool: &PgPool,
        list_id: i64,
    ) -> Result<Option<ListWithCreator>, sqlx::Error> {
        let list = sqlx::query_as::<_, ListWithCreator>(
            r#"
            SELECT l.list_id, l.title, l.created_by, u.email AS creator_email
            FROM lists l
            JOIN users u ON u.user_id = l.created_by
            WHERE l.list_id = $1
            "#,
        )
        .bind(list_id)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Overwrites the list title
    ///
    /// Returns false when the list does not exist.
    pub async fn update_title(
        pool: &PgPool,
        list_id: i64,
        title: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE lists SET title = $2 WHERE list_id = $1")
            .bind(list_id)
            .bind(title)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a list
    ///
    /// Items and membership rows go with it via ON DELETE CASCADE.
    pub async fn delete(pool: &PgPool, list_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lists WHERE list_id = $1")
            .bind(list_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
