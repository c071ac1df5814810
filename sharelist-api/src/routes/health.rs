/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sharelist_shared::db::pool;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

impl HealthResponse {
    /// Derives the report from database reachability
    ///
    /// The service is "healthy" exactly when the database round-trip
    /// succeeded; there is no other health input.
    fn for_database(reachable: bool) -> Self {
        let (status, database) = if reachable {
            ("healthy", "connected")
        } else {
            ("degraded", "disconnected")
        };

        HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }
    }
}

/// Health check handler
///
/// Always answers 200; database trouble shows up in the body, not the
/// status code, so monitoring can tell "down" from "degraded".
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let reachable = pool::health_check(&state.db).await.is_ok();

    Ok(Json(HealthResponse::for_database(reachable)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_report_tracks_database_reachability() {
        let up = HealthResponse::for_database(true);
        assert_eq!(up.status, "healthy");
        assert_eq!(up.database, "connected");
        assert!(!up.version.is_empty());

        let down = HealthResponse::for_database(false);
        assert_eq!(down.status, "degraded");
        assert_eq!(down.database, "disconnected");
    }
}
