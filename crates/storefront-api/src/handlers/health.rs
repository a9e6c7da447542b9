use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    session_store: &'static str,
    database: &'static str,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let session_store = match state.sessions.store().health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!("Session store not ready: {}", e);
            "unavailable"
        }
    };

    let database = match &state.database {
        None => "not_configured",
        Some(db) => match db.ping().await {
            Ok(()) => "ok",
            Err(e) => {
                warn!("Database not ready: {:?}", e);
                "unavailable"
            }
        },
    };

    let status = if session_store == "unavailable" || database == "unavailable" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(ReadinessResponse { session_store, database }))
}
