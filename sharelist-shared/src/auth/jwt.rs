/// Bearer token issuance and validation
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256) using a shared secret
/// known only to the server. The claims bind a user identity (`sub`) to the
/// `token_version` that user had when the token was issued; the session
/// module compares that version against the stored counter to decide whether
/// the token is still live.
///
/// Expiration is optional: tokens carry an `exp` claim only when the caller
/// issues them with a TTL. A token without `exp` never expires on its own;
/// it is invalidated solely by a logout bumping the token version.
///
/// # Example
///
/// ```
/// use sharelist_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(7, 0, Some(Duration::hours(24)));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
///
/// let decoded = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(decoded.sub, 7);
/// assert_eq!(decoded.token_version, 0);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into every token
const ISSUER: &str = "sharelist";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is malformed, unverifiable, or carries the wrong issuer
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: user id
/// - `token_version`: the user's token version at issuance
/// - `iss`: always "sharelist"
/// - `iat`: issued-at timestamp
/// - `exp`: expiration timestamp, present only when a TTL was configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Token version at issuance (session invalidation counter)
    pub token_version: i64,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp), absent for non-expiring tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Creates claims for a user at their current token version
    ///
    /// `ttl` of `None` produces a non-expiring token; logout remains the only
    /// way to invalidate it.
    pub fn new(user_id: i64, token_version: i64, ttl: Option<Duration>) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            token_version,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: ttl.map(|d| (now + d).timestamp()),
        }
    }

    /// Checks whether the embedded expiry, if any, has passed
    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => Utc::now().timestamp() >= exp,
            None => false,
        }
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature and the issuer. The `exp` claim is only
/// enforced when present, so non-expiring tokens validate indefinitely.
///
/// # Errors
///
/// - `JwtError::Expired` when the token carries a past `exp`
/// - `JwtError::InvalidToken` for a bad signature, wrong issuer, wrong
///   segment count, or an unparsable payload
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    // exp is optional: enforce it when present, tolerate its absence
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(42, 3, Some(Duration::hours(24)));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let decoded = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.token_version, 3);
        assert_eq!(decoded.iss, "sharelist");
        assert!(decoded.exp.is_some());
    }

    #[test]
    fn test_token_without_expiry_validates() {
        let claims = Claims::new(1, 0, None);
        assert!(claims.exp.is_none());
        assert!(!claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let decoded = validate_token(&token, SECRET).expect("Non-expiring token should validate");
        assert!(decoded.exp.is_none());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, 0, None);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "a-completely-different-secret-key!!!");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // exp one hour in the past
        let claims = Claims::new(1, 0, Some(Duration::seconds(-3600)));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_malformed_token() {
        assert!(validate_token("not-a-jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
        assert!(validate_token("a.b", SECRET).is_err());
    }

    #[test]
    fn test_validate_tampered_payload() {
        let claims = Claims::new(1, 0, None);
        let token = create_token(&claims, SECRET).expect("Should create token");

        // Swap the payload segment for one from a token signed for another user
        let other = create_token(&Claims::new(2, 0, None), SECRET).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_token_version_is_preserved() {
        for version in [0i64, 1, 17, i64::MAX] {
            let claims = Claims::new(5, version, None);
            let token = create_token(&claims, SECRET).unwrap();
            let decoded = validate_token(&token, SECRET).unwrap();
            assert_eq!(decoded.token_version, version);
        }
    }
}
