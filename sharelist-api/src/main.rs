//! # Sharelist API Server
//!
//! REST API for multi-user shared to-do lists: users register and log in,
//! create lists, share them by email, and manage items, with
//! membership-based access control and token-version session invalidation.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/sharelist \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p sharelist-api
//! ```

use sharelist_api::{
    app::{build_router, AppState},
    config::Config,
};
use sharelist_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharelist_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Sharelist API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
