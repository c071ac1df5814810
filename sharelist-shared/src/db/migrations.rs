/// Database migration runner
///
/// Wraps sqlx's embedded migrator. Migration files live in `migrations/` at
/// the workspace root; each file is named `{version}_{name}.sql` and is
/// applied exactly once, tracked in the `_sqlx_migrations` table.
///
/// # Example
///
/// ```no_run
/// use sharelist_shared::db::pool::{create_pool, DatabaseConfig};
/// use sharelist_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Migrations run in order and each runs inside a transaction where the
/// statements allow it; a failed migration is rolled back and returned as an
/// error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrator = sqlx::migrate!("../migrations");

    match migrator.run(pool).await {
        Ok(()) => {
            info!("All database migrations applied");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
