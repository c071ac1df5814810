/// Session validity checks
///
/// A token is "live" iff it decodes correctly and its embedded
/// `token_version` equals the version currently stored on the user row.
/// Logout bumps the stored counter, so every token issued before the logout
/// stops being live at once; there is no per-token revocation state.
///
/// Per user, token versions form a monotonically increasing sequence
/// starting at 0; a token is valid exactly in the window between its
/// issuance and the next logout.

use sqlx::PgPool;

use super::jwt::{self, Claims};
use crate::models::user::User;

/// Checks whether a raw bearer token represents a live session
///
/// Decode failures of any kind (bad signature, malformed token, expiry) are
/// reported as "not live" rather than as errors: in user-facing contexts an
/// unverifiable token and a stale one look the same.
///
/// # Errors
///
/// Only store failures are surfaced; a missing user yields `Ok(false)`.
pub async fn is_live(pool: &PgPool, token: &str, secret: &str) -> Result<bool, sqlx::Error> {
    let claims = match jwt::validate_token(token, secret) {
        Ok(claims) => claims,
        Err(_) => return Ok(false),
    };

    is_claims_live(pool, &claims).await
}

/// Checks liveness for already-validated claims
///
/// Used by the auth middleware, which has to decode the token anyway to
/// learn the caller's identity.
pub async fn is_claims_live(pool: &PgPool, claims: &Claims) -> Result<bool, sqlx::Error> {
    match User::token_version(pool, claims.sub).await? {
        Some(stored) => Ok(stored == claims.token_version),
        // User no longer exists: every token for them is dead
        None => Ok(false),
    }
}
