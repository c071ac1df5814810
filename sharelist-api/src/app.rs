/// Application state, router builder, and authentication middleware
///
/// # Example
///
/// ```no_run
/// use sharelist_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sharelist_shared::auth::{jwt, session};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// Cloned for each request via axum's `State` extractor; `Arc` keeps the
/// clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Identity of an authenticated caller, injected by [`jwt_auth_layer`]
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The caller's user id, taken from the validated token
    pub user_id: i64,
}

/// Possibly-anonymous caller identity, injected by [`optional_auth_layer`]
///
/// Read endpoints are public but annotate their responses relative to the
/// caller, so they need to know who is asking when a token happens to be
/// present.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalUser(pub Option<i64>);

/// Builds the complete axum router
///
/// # Routes
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// ├── /auth/
/// │   ├── POST /register               # Create account, returns token
/// │   ├── POST /login                  # Returns token
/// │   ├── POST /logout                 # Auth; invalidates all prior tokens
/// │   └── GET  /is-logged-in           # Always 200, {isLoggedIn: bool}
/// └── /lists/
///     ├── GET    /                     # Public (caller-relative annotation)
///     ├── POST   /                     # Auth
///     ├── GET    /:listId              # Public
///     ├── PUT    /:listId              # Auth, member
///     ├── DELETE /:listId              # Auth, creator
///     ├── GET    /:listId/items        # Public
///     ├── POST   /:listId/items        # Auth, member
///     ├── GET    /:listId/items/:itemId    # Public
///     ├── PUT    /:listId/items/:itemId    # Auth, member
///     ├── DELETE /:listId/items/:itemId    # Auth, member
///     ├── POST   /:listId/users        # Auth, creator
///     └── DELETE /:listId/users/:email # Auth, creator
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/is-logged-in", get(routes::auth::is_logged_in));

    let auth_protected = Router::new()
        .route("/logout", post(routes::auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let auth_routes = auth_public.merge(auth_protected);

    // Read endpoints: public, with caller-relative response annotation
    let list_read_routes = Router::new()
        .route("/", get(routes::lists::get_all_lists))
        .route("/:list_id", get(routes::lists::get_list))
        .route("/:list_id/items", get(routes::items::get_items))
        .route("/:list_id/items/:item_id", get(routes::items::get_item))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth_layer,
        ));

    // Mutating endpoints: require a live session
    let list_write_routes = Router::new()
        .route("/", post(routes::lists::create_list))
        .route("/:list_id", put(routes::lists::update_list))
        .route("/:list_id", delete(routes::lists::delete_list))
        .route("/:list_id/items", post(routes::items::add_item))
        .route("/:list_id/items/:item_id", put(routes::items::update_item))
        .route(
            "/:list_id/items/:item_id",
            delete(routes::items::delete_item),
        )
        .route("/:list_id/users", post(routes::members::add_user))
        .route(
            "/:list_id/users/:email",
            delete(routes::members::remove_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let list_routes = list_read_routes.merge(list_write_routes);

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/lists", list_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Pulls the bearer token out of the Authorization header
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Required-authentication middleware
///
/// Validates the bearer token, then runs the session validity check: the
/// token's embedded version must match the user's stored counter. Anything
/// short of that (absent header, malformed token, bad signature, stale
/// version) is a 401.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("Missing or malformed authorization header".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    if !session::is_claims_live(&state.db, &claims).await? {
        return Err(ApiError::Unauthorized(
            "Session is no longer valid".to_string(),
        ));
    }

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}

/// Optional-authentication middleware
///
/// Never rejects: a decodable token identifies the caller, anything else
/// leaves them anonymous.
async fn optional_auth_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user_id = bearer_token(&req)
        .and_then(|token| jwt::validate_token(token, state.jwt_secret()).ok())
        .map(|claims| claims.sub);

    req.extensions_mut().insert(OptionalUser(user_id));

    next.run(req).await
}
