use axum::{Json, extract::State};

use crate::{
    errors::Result,
    middleware::auth::CurrentUser,
    models::recovery::RecoveryStatus,
    services::recovery::{RecoverySnapshot, build_plan},
    state::AppState,
    utils::time::time_now,
};

pub async fn recovery_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<RecoveryStatus>> {
    let store = &state.store;
    let (tasks, interactions, offers, schools) = tokio::try_join!(
        store.list_tasks(&user.id),
        store.list_interactions(&user.id),
        store.list_offers(&user.id),
        store.list_schools(&user.id),
    )?;

    let snapshot =
        RecoverySnapshot::from_records(&tasks, &interactions, &offers, &schools, time_now());
    Ok(Json(build_plan(&snapshot)))
}
