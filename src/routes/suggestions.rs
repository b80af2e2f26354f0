use axum::{Json, extract::State};
use serde::Serialize;
use tracing::error;

use crate::{
    errors::Result,
    middleware::{auth::CurrentUser, request_id::RequestId},
    models::suggestion::Suggestion,
    outcome::Outcome,
    services::suggestions::{BatchSize, surface_pending},
    state::AppState,
    utils::time::time_now,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceResponse {
    pub success: bool,
    pub surfaced_count: usize,
}

pub async fn surface_suggestions(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    CurrentUser(user): CurrentUser,
) -> Outcome<SurfaceResponse> {
    match surface_pending(
        state.store.as_ref(),
        &user.id,
        BatchSize::standard(),
        time_now(),
    )
    .await
    {
        Ok(surfaced_count) => Outcome::Success(SurfaceResponse {
            success: true,
            surfaced_count,
        }),
        Err(e) => {
            error!(user_id = %user.id, request_id = %request_id, "surfacing suggestions failed: {e}");
            Outcome::SoftFailure("Could not surface suggestions right now".to_string())
        }
    }
}

pub async fn list_surfaced(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Suggestion>>> {
    let rows = state.store.surfaced_suggestions(&user.id).await?;
    Ok(Json(rows))
}
