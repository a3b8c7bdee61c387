use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{conf::settings, pkg::server::state::AppState, prelude::Result};

pub async fn livez() -> Json<Value> {
    Json(json!({"service": settings.service_name, "status": "live"}))
}

/// Liveness plus a database round-trip.
pub async fn healthz(State(state): State<AppState>) -> Result<Json<Value>> {
    sqlx::query("SELECT 1").execute(&*state.db_pool).await?;
    Ok(Json(json!({"service": settings.service_name, "status": "healthy"})))
}
