/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup
/// - Test user registration through the API
/// - Request building and response parsing helpers
///
/// The integration tests need a running Postgres (DATABASE_URL) and a
/// JWT_SECRET, so they are all `#[ignore]`d and run explicitly with
/// `cargo test -- --ignored`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sharelist_api::app::{build_router, AppState};
use sharelist_api::config::Config;
use sharelist_shared::models::user::User;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use tower::Service as _;

static EMAIL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,

    /// Emails registered through this context, removed on cleanup
    registered: Vec<String>,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            registered: Vec::new(),
        })
    }

    /// Returns a process-unique test email
    pub fn unique_email(&self, tag: &str) -> String {
        let n = EMAIL_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}@example.com", tag, std::process::id(), n)
    }

    /// Registers a user through the API and returns its token
    pub async fn register(&mut self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        self.registered.push(email.to_string());
        body["token"].as_str().unwrap().to_string()
    }

    /// Sends a request and returns status plus parsed JSON body
    ///
    /// Bodyless responses (204) parse as JSON null.
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Removes all users created through this context
    ///
    /// Deleting a user cascades to their lists, memberships, and items.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for email in &self.registered {
            if let Some(user) = User::find_by_email(&self.db, email).await? {
                User::delete(&self.db, user.user_id).await?;
            }
        }
        Ok(())
    }
}

/// Helper to create a list and return its id
pub async fn create_test_list(ctx: &mut TestContext, token: &str, title: &str) -> i64 {
    let (status, body) = ctx
        .request(
            "POST",
            "/lists",
            Some(token),
            Some(serde_json::json!({ "title": title })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create list failed: {}", body);

    body["list"]["listId"].as_i64().unwrap()
}

/// Helper to add an item and return its id
pub async fn create_test_item(
    ctx: &mut TestContext,
    token: &str,
    list_id: i64,
    title: &str,
) -> i64 {
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/lists/{}/items", list_id),
            Some(token),
            Some(serde_json::json!({
                "title": title,
                "description": "test item",
                "deadline": "2030-01-01",
                "flag": "active"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create item failed: {}", body);

    body["item"]["itemId"].as_i64().unwrap()
}
