/// Item model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE item_flag AS ENUM ('active', 'finished', 'aborted');
///
/// CREATE TABLE items (
///     item_id     BIGSERIAL PRIMARY KEY,
///     list_id     BIGINT NOT NULL REFERENCES lists(list_id) ON DELETE CASCADE,
///     title       VARCHAR(50) NOT NULL,
///     description VARCHAR(255) NOT NULL,
///     created_by  BIGINT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
///     flag        item_flag NOT NULL DEFAULT 'active',
///     deadline    TIMESTAMPTZ NOT NULL,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Items are always addressed through their list: lookups, updates, and
/// deletes all scope on `(list_id, item_id)`, so an item id from another
/// list reads as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;

/// Item state flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_flag", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemFlag {
    /// Still to do
    Active,

    /// Done
    Finished,

    /// Given up on
    Aborted,
}

impl ItemFlag {
    /// Flag as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFlag::Active => "active",
            ItemFlag::Finished => "finished",
            ItemFlag::Aborted => "aborted",
        }
    }
}

impl FromStr for ItemFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ItemFlag::Active),
            "finished" => Ok(ItemFlag::Finished),
            "aborted" => Ok(ItemFlag::Aborted),
            other => Err(format!(
                "flag must be one of 'active', 'finished', 'aborted', got '{}'",
                other
            )),
        }
    }
}

/// Item record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    /// Unique item id
    pub item_id: i64,

    /// Parent list
    pub list_id: i64,

    /// Item title (at most 50 characters)
    pub title: String,

    /// Item description (at most 255 characters)
    pub description: String,

    /// Creator's user id
    pub created_by: i64,

    /// Current state
    pub flag: ItemFlag,

    /// Due date
    pub deadline: DateTime<Utc>,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

/// Item row joined with its creator's email
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemWithCreator {
    pub item_id: i64,
    pub list_id: i64,
    pub title: String,
    pub description: String,
    pub created_by: i64,
    pub flag: ItemFlag,
    pub deadline: DateTime<Utc>,
    pub creator_email: String,
}

/// Input for creating a new item
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub list_id: i64,
    pub title: String,
    pub description: String,
    pub created_by: i64,
    pub flag: ItemFlag,
    pub deadline: DateTime<Utc>,
}

/// Input for updating an existing item
///
/// All four mutable fields are overwritten together; the API layer
/// validates them before this is built.
#[derive(Debug, Clone)]
pub struct UpdateItem {
    pub title: String,
    pub description: String,
    pub flag: ItemFlag,
    pub deadline: DateTime<Utc>,
}

impl Item {
    /// Creates a new item in a list
    pub async fn create(pool: &PgPool, data: CreateItem) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (list_id, title, description, created_by, flag, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING item_id, list_id, title, description, created_by, flag, deadline, created_at
            "#,
        )
        .bind(data.list_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.created_by)
        .bind(data.flag)
        .bind(data.deadline)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Finds an item within a list
    ///
    /// An item that exists but belongs to a different list is reported as
    /// absent.
    pub async fn find_in_list(
        pool: &PgPool,
        list_id: i64,
        item_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT item_id, list_id, title, description, created_by, flag, deadline, created_at
            FROM items
            WHERE list_id = $1 AND item_id = $2
            "#,
        )
        .bind(list_id)
        .bind(item_id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Fetches items for a set of lists, joined with creator emails
    pub async fn fetch_for_lists(
        pool: &PgPool,
        list_ids: &[i64],
    ) -> Result<Vec<ItemWithCreator>, sqlx::Error> {
        let items = sqlx::query_as::<_, ItemWithCreator>(
            r#"
            SELECT i.item_id, i.list_id, i.title, i.description, i.created_by,
                   i.flag, i.deadline, u.email AS creator_email
            FROM items i
            JOIN users u ON u.user_id = i.created_by
            WHERE i.list_id = ANY($1)
            ORDER BY i.item_id
            "#,
        )
        .bind(list_ids)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Fetches one item within a list, joined with its creator email
    pub async fn fetch_one_with_creator(
        pool: &PgPool,
        list_id: i64,
        item_id: i64,
    ) -> Result<Option<ItemWithCreator>, sqlx::Error> {
        let item = sqlx::query_as::<_, ItemWithCreator>(
            r#"
            SELECT i.item_id, i.list_id, i.title, i.description, i.created_by,
                   i.flag, i.deadline, u.email AS creator_email
            FROM items i
            JOIN users u ON u.user_id = i.created_by
            WHERE i.list_id = $1 AND i.item_id = $2
            "#,
        )
        .bind(list_id)
        .bind(item_id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Overwrites an item's mutable fields
    ///
    /// Returns the updated item, or `None` when it does not exist in the
    /// given list.
    pub async fn update(
        pool: &PgPool,
        list_id: i64,
        item_id: i64,
        data: UpdateItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET title = $3, description = $4, flag = $5, deadline = $6
            WHERE list_id = $1 AND item_id = $2
            RETURNING item_id, list_id, title, description, created_by, flag, deadline, created_at
            "#,
        )
        .bind(list_id)
        .bind(item_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.flag)
        .bind(data.deadline)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Deletes an item from a list
    ///
    /// Returns false when there was nothing to delete, so a second delete of
    /// the same item is distinguishable from the first.
    pub async fn delete(pool: &PgPool, list_id: i64, item_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE list_id = $1 AND item_id = $2")
            .bind(list_id)
            .bind(item_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_flag_parse() {
        assert_eq!("active".parse::<ItemFlag>().unwrap(), ItemFlag::Active);
        assert_eq!("finished".parse::<ItemFlag>().unwrap(), ItemFlag::Finished);
        assert_eq!("aborted".parse::<ItemFlag>().unwrap(), ItemFlag::Aborted);

        assert!("done".parse::<ItemFlag>().is_err());
        assert!("".parse::<ItemFlag>().is_err());
        assert!("Active".parse::<ItemFlag>().is_err());
    }

    #[test]
    fn test_item_flag_as_str_roundtrip() {
        for flag in [ItemFlag::Active, ItemFlag::Finished, ItemFlag::Aborted] {
            assert_eq!(flag.as_str().parse::<ItemFlag>().unwrap(), flag);
        }
    }

    #[test]
    fn test_item_flag_serde() {
        assert_eq!(
            serde_json::to_string(&ItemFlag::Aborted).unwrap(),
            "\"aborted\""
        );
        let flag: ItemFlag = serde_json::from_str("\"finished\"").unwrap();
        assert_eq!(flag, ItemFlag::Finished);
    }
}
