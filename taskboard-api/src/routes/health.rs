/// Health check endpoint
///
/// `GET /health` — public, no authentication. Reports the server version
/// and verifies database connectivity.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server can respond
    pub status: &'static str,

    /// Server version
    pub version: &'static str,
}

/// Returns server health
///
/// Fails with 500 if the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    taskboard_shared::db::pool::health_check(&state.db).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
