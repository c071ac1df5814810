/// List-level access control predicates
///
/// Sharelist distinguishes two relationships between a user and a list:
///
/// - **member**: a membership row exists for the pair. Members may rename
///   the list and create, update, and delete its items.
/// - **creator**: the list's `created_by` column names the user. Only the
///   creator may delete the list or change its membership.
///
/// List creation makes the creator the first member, but the two
/// relationships stay independent afterwards: a creator who removes their
/// own membership keeps creator rights over the list.
///
/// These are pure predicates over current store state; the route handlers
/// decide which relationship an operation requires and map a `false` to 403.

use sqlx::PgPool;

/// True iff a membership row exists for `(list_id, user_id)`
pub async fn is_list_member(
    pool: &PgPool,
    user_id: i64,
    list_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT 1::BIGINT FROM memberships
        WHERE list_id = $1 AND user_id = $2
        "#,
    )
    .bind(list_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// True iff the list exists and `user_id` created it
pub async fn is_list_creator(
    pool: &PgPool,
    user_id: i64,
    list_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT 1::BIGINT FROM lists
        WHERE list_id = $1 AND created_by = $2
        "#,
    )
    .bind(list_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}
