//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Passive stats: live event subscribers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Passive stats, no backend round-trips.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "subscribers": state.events.subscriber_count(),
    }))
}
