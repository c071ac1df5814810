/// List membership endpoints
///
/// # Endpoints
///
/// - `POST   /lists/:listId/users` - Add a user to a list (auth, creator)
/// - `DELETE /lists/:listId/users/:email` - Remove a user from a list (auth, creator)
///
/// Both operations are restricted to the list's creator. Members gain the
/// ability to rename the list and work with its items; only the creator
/// controls who those members are.

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sharelist_shared::{
    auth::authorization,
    models::{list::List, membership::Membership, user::User},
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddUserRequest {
    /// Email of the user to add
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

async fn require_creator(state: &AppState, user_id: i64, list_id: i64, action: &str) -> ApiResult<()> {
    if List::find_by_id(&state.db, list_id).await?.is_none() {
        return Err(ApiError::NotFound("List not found".to_string()));
    }

    if !authorization::is_list_creator(&state.db, user_id, list_id).await? {
        return Err(ApiError::Forbidden(format!(
            "Only the owner of a list can {} users",
            action
        )));
    }

    Ok(())
}

/// `POST /lists/:listId/users` - add a user to a list
///
/// # Errors
///
/// - `400 Bad Request`: invalid email
/// - `404 Not Found`: no such list, or no user with that email
/// - `403 Forbidden`: caller is not the creator
/// - `409 Conflict`: user is already a member
pub async fn add_user(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<AddUserRequest>,
) -> ApiResult<StatusCode> {
    req.validate().map_err(ApiError::from_validation)?;

    require_creator(&state, auth.user_id, list_id, "add").await?;

    let target = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if authorization::is_list_member(&state.db, target.user_id, list_id).await? {
        return Err(ApiError::Conflict("User is already in the list".to_string()));
    }

    // The composite primary key still backstops a concurrent add; the
    // unique violation maps to the same 409.
    Membership::create(&state.db, list_id, target.user_id).await?;

    Ok(StatusCode::CREATED)
}

/// `DELETE /lists/:listId/users/:email` - remove a user from a list
///
/// The creator can remove themselves; the list survives without them and
/// they keep creator rights over it.
///
/// # Errors
///
/// - `404 Not Found`: no such list, no user with that email, or the user
///   is not a member
/// - `403 Forbidden`: caller is not the creator
pub async fn remove_user(
    State(state): State<AppState>,
    Path((list_id, email)): Path<(i64, String)>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<StatusCode> {
    require_creator(&state, auth.user_id, list_id, "remove").await?;

    let target = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !Membership::delete(&state.db, list_id, target.user_id).await? {
        return Err(ApiError::NotFound("User not in list".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_user_request_validation() {
        let ok = AddUserRequest {
            email: "b@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = AddUserRequest {
            email: "not-an-email".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
