/// Item endpoints
///
/// # Endpoints
///
/// - `GET    /lists/:listId/items` - Items of a list (public)
/// - `POST   /lists/:listId/items` - Add an item (auth, member)
/// - `GET    /lists/:listId/items/:itemId` - One item (public)
/// - `PUT    /lists/:listId/items/:itemId` - Overwrite an item (auth, member)
/// - `DELETE /lists/:listId/items/:itemId` - Delete an item (auth, member)
///
/// Item payloads are checked field by field, in a fixed order, so clients
/// always see the first failing field rather than an arbitrary one.

use crate::{
    app::{AppState, AuthUser, OptionalUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sharelist_shared::{
    auth::authorization,
    models::{
        item::{CreateItem, Item, ItemFlag, ItemWithCreator, UpdateItem},
        list::List,
    },
};

const TITLE_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 255;

/// Create / update request body
///
/// `deadline` and `flag` arrive as strings and are parsed during
/// validation.
#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub flag: String,
}

/// Validated form of [`ItemPayload`]
#[derive(Debug)]
pub struct ValidItem {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub flag: ItemFlag,
}

impl ItemPayload {
    /// Validates fields in order: title, description, deadline, flag
    pub fn validate(self) -> Result<ValidItem, ApiError> {
        if self.title.is_empty() {
            return Err(ApiError::invalid_field("title", "title must not be empty"));
        }
        if self.title.chars().count() > TITLE_MAX {
            return Err(ApiError::invalid_field(
                "title",
                "title must be at most 50 characters",
            ));
        }

        if self.description.is_empty() {
            return Err(ApiError::invalid_field(
                "description",
                "description must not be empty",
            ));
        }
        if self.description.chars().count() > DESCRIPTION_MAX {
            return Err(ApiError::invalid_field(
                "description",
                "description must be at most 255 characters",
            ));
        }

        let deadline = parse_deadline(&self.deadline)
            .ok_or_else(|| ApiError::invalid_field("deadline", "deadline must be a valid date"))?;

        let flag = self
            .flag
            .parse::<ItemFlag>()
            .map_err(|message| ApiError::invalid_field("flag", message))?;

        Ok(ValidItem {
            title: self.title,
            description: self.description,
            deadline,
            flag,
        })
    }
}

/// Parses a deadline string
///
/// Accepts full RFC 3339 timestamps, naive date-times, and bare dates
/// (taken as midnight UTC).
fn parse_deadline(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// An item as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub item_id: i64,

    #[serde(skip)]
    pub list_id: i64,

    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub flag: ItemFlag,

    /// Whether the requesting user created this item
    pub is_creator: bool,

    /// Creator's email; null for anonymous callers
    pub creator_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemsEnvelope {
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct ItemEnvelope {
    pub item: ItemResponse,
}

impl ItemResponse {
    /// Annotates an item row relative to the caller
    pub fn annotate(row: ItemWithCreator, caller: Option<i64>) -> Self {
        ItemResponse {
            item_id: row.item_id,
            list_id: row.list_id,
            title: row.title,
            description: row.description,
            deadline: row.deadline,
            flag: row.flag,
            is_creator: caller == Some(row.created_by),
            creator_email: caller.is_some().then_some(row.creator_email),
        }
    }
}

async fn require_list(state: &AppState, list_id: i64) -> ApiResult<()> {
    if List::find_by_id(&state.db, list_id).await?.is_none() {
        return Err(ApiError::NotFound("List not found".to_string()));
    }
    Ok(())
}

async fn require_member(state: &AppState, user_id: i64, list_id: i64, action: &str) -> ApiResult<()> {
    if !authorization::is_list_member(&state.db, user_id, list_id).await? {
        return Err(ApiError::Forbidden(format!(
            "Only a user associated with a list can {} items",
            action
        )));
    }
    Ok(())
}

/// `GET /lists/:listId/items`
pub async fn get_items(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Extension(OptionalUser(caller)): Extension<OptionalUser>,
) -> ApiResult<Json<ItemsEnvelope>> {
    require_list(&state, list_id).await?;

    let items = Item::fetch_for_lists(&state.db, &[list_id])
        .await?
        .into_iter()
        .map(|row| ItemResponse::annotate(row, caller))
        .collect();

    Ok(Json(ItemsEnvelope { items }))
}

/// `GET /lists/:listId/items/:itemId`
///
/// # Errors
///
/// - `404 Not Found`: no such list, or no such item in this list
pub async fn get_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(i64, i64)>,
    Extension(OptionalUser(caller)): Extension<OptionalUser>,
) -> ApiResult<Json<ItemEnvelope>> {
    require_list(&state, list_id).await?;

    let row = Item::fetch_one_with_creator(&state.db, list_id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(ItemEnvelope {
        item: ItemResponse::annotate(row, caller),
    }))
}

/// `POST /lists/:listId/items` - add an item
///
/// # Errors
///
/// - `400 Bad Request`: invalid payload
/// - `404 Not Found`: no such list
/// - `403 Forbidden`: caller is not a member
pub async fn add_item(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ItemPayload>,
) -> ApiResult<(StatusCode, Json<ItemEnvelope>)> {
    let valid = payload.validate()?;

    require_list(&state, list_id).await?;
    require_member(&state, auth.user_id, list_id, "add").await?;

    let created = Item::create(
        &state.db,
        CreateItem {
            list_id,
            title: valid.title,
            description: valid.description,
            created_by: auth.user_id,
            flag: valid.flag,
            deadline: valid.deadline,
        },
    )
    .await?;

    let row = Item::fetch_one_with_creator(&state.db, list_id, created.item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope {
            item: ItemResponse::annotate(row, Some(auth.user_id)),
        }),
    ))
}

/// `PUT /lists/:listId/items/:itemId` - overwrite an item
///
/// All four mutable fields are replaced together; partial updates are not
/// supported.
///
/// # Errors
///
/// - `400 Bad Request`: invalid payload
/// - `404 Not Found`: no such list, or no such item in this list
/// - `403 Forbidden`: caller is not a member
pub async fn update_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(i64, i64)>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ItemPayload>,
) -> ApiResult<Json<ItemEnvelope>> {
    let valid = payload.validate()?;

    require_list(&state, list_id).await?;
    require_member(&state, auth.user_id, list_id, "update").await?;

    let updated = Item::update(
        &state.db,
        list_id,
        item_id,
        UpdateItem {
            title: valid.title,
            description: valid.description,
            flag: valid.flag,
            deadline: valid.deadline,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    let row = Item::fetch_one_with_creator(&state.db, list_id, updated.item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(ItemEnvelope {
        item: ItemResponse::annotate(row, Some(auth.user_id)),
    }))
}

/// `DELETE /lists/:listId/items/:itemId` - delete an item
///
/// # Errors
///
/// - `404 Not Found`: no such list, or no such item in this list
/// - `403 Forbidden`: caller is not a member
pub async fn delete_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(i64, i64)>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<StatusCode> {
    require_list(&state, list_id).await?;
    require_member(&state, auth.user_id, list_id, "delete").await?;

    if !Item::delete(&state.db, list_id, item_id).await? {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(title: &str, description: &str, deadline: &str, flag: &str) -> ItemPayload {
        ItemPayload {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
            flag: flag.to_string(),
        }
    }

    #[test]
    fn test_valid_payload() {
        let valid = payload("Milk", "2 liters", "2030-01-01", "active")
            .validate()
            .unwrap();

        assert_eq!(valid.title, "Milk");
        assert_eq!(valid.flag, ItemFlag::Active);
        assert_eq!(valid.deadline, Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_validation_order_reports_first_failure() {
        // Everything is wrong; title is reported first.
        let err = payload("", "", "nope", "done").validate().unwrap_err();
        match err {
            ApiError::ValidationError(details) => assert_eq!(details[0].field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let err = payload("Milk", "", "nope", "done").validate().unwrap_err();
        match err {
            ApiError::ValidationError(details) => assert_eq!(details[0].field, "description"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let err = payload("Milk", "2 liters", "nope", "done")
            .validate()
            .unwrap_err();
        match err {
            ApiError::ValidationError(details) => assert_eq!(details[0].field, "deadline"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let err = payload("Milk", "2 liters", "2030-01-01", "done")
            .validate()
            .unwrap_err();
        match err {
            ApiError::ValidationError(details) => assert_eq!(details[0].field, "flag"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_length_limits() {
        let long_title = "x".repeat(51);
        assert!(payload(&long_title, "d", "2030-01-01", "active")
            .validate()
            .is_err());

        let max_title = "x".repeat(50);
        assert!(payload(&max_title, "d", "2030-01-01", "active")
            .validate()
            .is_ok());

        let long_description = "x".repeat(256);
        assert!(payload("t", &long_description, "2030-01-01", "active")
            .validate()
            .is_err());
    }

    #[test]
    fn test_parse_deadline_formats() {
        assert!(parse_deadline("2030-01-01T12:30:00Z").is_some());
        assert!(parse_deadline("2030-01-01T12:30:00+02:00").is_some());
        assert!(parse_deadline("2030-01-01T12:30:00").is_some());
        assert!(parse_deadline("2030-01-01").is_some());

        assert!(parse_deadline("").is_none());
        assert!(parse_deadline("tomorrow").is_none());
        assert!(parse_deadline("2030-13-01").is_none());
    }

    #[test]
    fn test_item_response_hides_creator_email_from_anonymous() {
        let row = ItemWithCreator {
            item_id: 7,
            list_id: 1,
            title: "Milk".to_string(),
            description: "2 liters".to_string(),
            created_by: 42,
            flag: ItemFlag::Active,
            deadline: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            creator_email: "a@x.com".to_string(),
        };

        let anon = ItemResponse::annotate(row.clone(), None);
        assert!(!anon.is_creator);
        assert_eq!(anon.creator_email, None);

        let creator = ItemResponse::annotate(row.clone(), Some(42));
        assert!(creator.is_creator);
        assert_eq!(creator.creator_email.as_deref(), Some("a@x.com"));

        let other = ItemResponse::annotate(row, Some(7));
        assert!(!other.is_creator);
        assert_eq!(other.creator_email.as_deref(), Some("a@x.com"));
    }
}
