use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// The process is up but the track store did not answer.
    Degraded,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub store_healthy: bool,
}

impl HealthResponse {
    fn new(store_healthy: bool) -> Self {
        Self {
            status: if store_healthy {
                HealthStatus::Ok
            } else {
                HealthStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION"),
            store_healthy,
        }
    }
}

/// GET /health
///
/// Always 200; a failing store shows up as `"degraded"` in the body. The
/// store error itself is only logged.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ping = state.tracks.store().ping().await;
    if let Err(err) = &ping {
        tracing::warn!(error = %err, "Track store ping failed");
    }
    Json(HealthResponse::new(ping.is_ok()))
}

/// Root-level routes, mounted outside `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
