/// Authentication and authorization utilities
///
/// This module carries the security core of Sharelist:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: signed bearer tokens binding a user id and their token version
/// - [`session`]: session validity (token version vs. stored counter)
/// - [`authorization`]: list-level access control predicates
///
/// # Session Model
///
/// Tokens are stateless HS256 JWTs, but each carries the `token_version` the
/// user had at issuance. Logout increments the stored counter, which
/// invalidates every previously issued token for that user in O(1); no
/// revocation list is kept.
///
/// # Example
///
/// ```no_run
/// use sharelist_shared::auth::password::{hash_password, verify_password};
/// use sharelist_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(42, 0, None);
/// let token = create_token(&claims, "secret-key")?;
/// let decoded = validate_token(&token, "secret-key")?;
/// assert_eq!(decoded.sub, 42);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod session;
