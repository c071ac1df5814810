/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create account, returns a bearer token
/// - `POST /auth/login` - Verify credentials, returns a bearer token
/// - `POST /auth/logout` - Invalidate every token issued so far
/// - `GET  /auth/is-logged-in` - Session probe, always 200
///
/// Logout does not delete anything: it bumps the user's `token_version`,
/// and the session validity check fails every token carrying the old value.

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use sharelist_shared::{
    auth::{jwt, password, session},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register / login request
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Token response for register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Session probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct IsLoggedInResponse {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: malformed email or too-short password
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // The unique constraint on email is the final arbiter; a concurrent
    // registration that slipped past the pre-check surfaces as 409 here.
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.user_id, user.token_version, state.config.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Log in with email and password
///
/// # Errors
///
/// - `400 Bad Request`: malformed email or too-short password
/// - `404 Not Found`: unknown email or wrong password (indistinguishable on
///   purpose)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invalid email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::NotFound("Invalid email or password".to_string()));
    }

    let claims = jwt::Claims::new(user.user_id, user.token_version, state.config.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse { token }))
}

/// Log out the calling user
///
/// Increments the stored token version, which invalidates ALL tokens issued
/// to this user before this point - there is no partial logout.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<LogoutResponse>> {
    let bumped = User::bump_token_version(&state.db, auth.user_id).await?;
    if !bumped {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(LogoutResponse {
        message: "User logged out".to_string(),
    }))
}

/// Session probe
///
/// Always answers 200. A missing header, garbage token, stale version, or
/// even a store failure all collapse to `{"isLoggedIn": false}` - this
/// endpoint never surfaces an error to the caller.
pub async fn is_logged_in(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Json<IsLoggedInResponse> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let is_logged_in = match token {
        Some(token) => session::is_live(&state.db, token, state.jwt_secret())
            .await
            .unwrap_or(false),
        None => false,
    };

    Json(IsLoggedInResponse { is_logged_in })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let valid = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = CredentialsRequest {
            email: "a@x.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_is_logged_in_response_field_name() {
        let body = serde_json::to_string(&IsLoggedInResponse {
            is_logged_in: false,
        })
        .unwrap();
        assert_eq!(body, r#"{"isLoggedIn":false}"#);
    }
}
