/// Liveness endpoint
///
/// `GET /health` answers outside the `/api` surface and without a token.
/// It reports whether the process is up and whether the task store is
/// reachable, so a degraded database shows up here before users hit 500s.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0", "database": "connected" }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Body of the liveness report
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the store answers, "degraded" otherwise
    pub status: String,

    /// Running binary version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,
}

/// Probes the database and reports overall service health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let probe = sqlx::query("SELECT 1").fetch_one(&state.db).await;

    let (status, database) = match probe {
        Ok(_) => ("healthy", "connected"),
        Err(_) => ("degraded", "disconnected"),
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
