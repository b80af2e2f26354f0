use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.readiness.is_ready() {
        "ok"
    } else {
        "starting"
    };
    Json(HealthResponse { status })
}

/// Values the browser bundle needs. Secrets stay server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub provider_url: String,
    pub anon_key: String,
}

pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        provider_url: state.config.provider_url.clone(),
        anon_key: state.config.anon_key.clone(),
    })
}
