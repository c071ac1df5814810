/// List endpoints
///
/// # Endpoints
///
/// - `GET    /lists` - All lists with nested items (public)
/// - `POST   /lists` - Create a list (auth)
/// - `GET    /lists/:listId` - One list (public)
/// - `PUT    /lists/:listId` - Rename a list (auth, member)
/// - `DELETE /lists/:listId` - Delete a list (auth, creator)
///
/// Read responses are annotated relative to the caller: `isCreator` is
/// computed against the authenticated user and `creatorEmail` is withheld
/// (null) from anonymous callers.

use crate::{
    app::{AppState, AuthUser, OptionalUser},
    error::{ApiError, ApiResult},
    routes::items::ItemResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sharelist_shared::{
    auth::authorization,
    models::{
        item::Item,
        list::{List, ListWithCreator},
        membership::Membership,
    },
};
use std::collections::HashMap;
use validator::Validate;

/// Create / rename request
#[derive(Debug, Deserialize, Validate)]
pub struct ListTitleRequest {
    /// List title
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
}

/// A list as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub list_id: i64,
    pub title: String,

    /// Whether the requesting user created this list
    pub is_creator: bool,

    /// Creator's email; null for anonymous callers
    pub creator_email: Option<String>,

    /// Emails of all members
    pub users: Vec<String>,

    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct ListsEnvelope {
    pub lists: Vec<ListResponse>,
}

#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub list: ListResponse,
}

/// Assembles annotated list responses for a set of list rows
///
/// One round trip each for items and member emails, grouped in memory -
/// associations are explicit joins, not per-row lookups.
async fn assemble_lists(
    state: &AppState,
    rows: Vec<ListWithCreator>,
    caller: Option<i64>,
) -> Result<Vec<ListResponse>, sqlx::Error> {
    let list_ids: Vec<i64> = rows.iter().map(|l| l.list_id).collect();

    let mut items_by_list: HashMap<i64, Vec<ItemResponse>> = HashMap::new();
    for item in Item::fetch_for_lists(&state.db, &list_ids).await? {
        items_by_list
            .entry(item.list_id)
            .or_default()
            .push(ItemResponse::annotate(item, caller));
    }

    let mut users_by_list: HashMap<i64, Vec<String>> = HashMap::new();
    for member in Membership::member_emails(&state.db, &list_ids).await? {
        users_by_list
            .entry(member.list_id)
            .or_default()
            .push(member.email);
    }

    Ok(rows
        .into_iter()
        .map(|row| ListResponse {
            is_creator: caller == Some(row.created_by),
            creator_email: caller.is_some().then_some(row.creator_email),
            users: users_by_list.remove(&row.list_id).unwrap_or_default(),
            items: items_by_list.remove(&row.list_id).unwrap_or_default(),
            list_id: row.list_id,
            title: row.title,
        })
        .collect())
}

/// Fetches and assembles a single list, or 404
async fn assemble_one(
    state: &AppState,
    list_id: i64,
    caller: Option<i64>,
) -> ApiResult<ListResponse> {
    let row = List::fetch_one_with_creator(&state.db, list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    let mut lists = assemble_lists(state, vec![row], caller).await?;
    Ok(lists.remove(0))
}

/// `GET /lists` - all lists with nested items and member emails
pub async fn get_all_lists(
    State(state): State<AppState>,
    Extension(OptionalUser(caller)): Extension<OptionalUser>,
) -> ApiResult<Json<ListsEnvelope>> {
    let rows = List::fetch_all_with_creator(&state.db).await?;
    let lists = assemble_lists(&state, rows, caller).await?;

    Ok(Json(ListsEnvelope { lists }))
}

/// `GET /lists/:listId`
///
/// # Errors
///
/// - `404 Not Found`: no such list
pub async fn get_list(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Extension(OptionalUser(caller)): Extension<OptionalUser>,
) -> ApiResult<Json<ListEnvelope>> {
    let list = assemble_one(&state, list_id, caller).await?;

    Ok(Json(ListEnvelope { list }))
}

/// `POST /lists` - create a list
///
/// The caller becomes the creator and the first member, atomically.
///
/// # Errors
///
/// - `400 Bad Request`: empty title
pub async fn create_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ListTitleRequest>,
) -> ApiResult<(StatusCode, Json<ListEnvelope>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let created = List::create(&state.db, auth.user_id, &req.title).await?;
    let list = assemble_one(&state, created.list_id, Some(auth.user_id)).await?;

    Ok((StatusCode::CREATED, Json(ListEnvelope { list })))
}

/// `PUT /lists/:listId` - rename a list
///
/// # Errors
///
/// - `400 Bad Request`: empty title
/// - `404 Not Found`: no such list
/// - `403 Forbidden`: caller is not a member
pub async fn update_list(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ListTitleRequest>,
) -> ApiResult<StatusCode> {
    req.validate().map_err(ApiError::from_validation)?;

    if List::find_by_id(&state.db, list_id).await?.is_none() {
        return Err(ApiError::NotFound("List not found".to_string()));
    }

    if !authorization::is_list_member(&state.db, auth.user_id, list_id).await? {
        return Err(ApiError::Forbidden(
            "Only a member of a list can update it".to_string(),
        ));
    }

    List::update_title(&state.db, list_id, &req.title).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /lists/:listId` - delete a list
///
/// Cascades to the list's items and memberships.
///
/// # Errors
///
/// - `404 Not Found`: no such list
/// - `403 Forbidden`: caller is not the creator
pub async fn delete_list(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<StatusCode> {
    if List::find_by_id(&state.db, list_id).await?.is_none() {
        return Err(ApiError::NotFound("List not found".to_string()));
    }

    if !authorization::is_list_creator(&state.db, auth.user_id, list_id).await? {
        return Err(ApiError::Forbidden(
            "Only the owner of a list can delete it".to_string(),
        ));
    }

    List::delete(&state.db, list_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_validation() {
        let ok = ListTitleRequest {
            title: "Groceries".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = ListTitleRequest {
            title: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_list_response_wire_format() {
        let body = serde_json::to_value(ListResponse {
            list_id: 1,
            title: "Groceries".to_string(),
            is_creator: true,
            creator_email: Some("a@x.com".to_string()),
            users: vec!["a@x.com".to_string()],
            items: vec![],
        })
        .unwrap();

        assert_eq!(body["listId"], 1);
        assert_eq!(body["isCreator"], true);
        assert_eq!(body["creatorEmail"], "a@x.com");
    }
}
