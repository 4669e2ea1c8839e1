//! Liveness plus a database round-trip.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
    pub server_time: String,
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

/// 200 when SQLite answers, 503 otherwise.
async fn health(State(state): State<SharedState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;

    let status = if database {
        StatusCode::OK
    } else {
        warn!("Health check failed: database unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "serving" } else { "not_serving" },
            database,
            version: env!("CARGO_PKG_VERSION"),
            server_time: Utc::now().to_rfc3339(),
        }),
    )
}
