use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    consts::table_const::USER_TABLE,
    errors::{Error, Result},
    models::user::User,
    store::AdminStats,
    state::AppState,
    utils::{get_record_id::get_record_id_in_table, validated_form::ValidatedJson},
};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<AdminStats>> {
    Ok(Json(state.store.admin_stats().await?))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let mut users = state.store.list_users().await?;
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(Json(users))
}

pub async fn unknown_view() -> Error {
    Error::NotFound
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

pub async fn set_admin(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(input): ValidatedJson<SetAdminRequest>,
) -> Result<Json<User>> {
    get_record_id_in_table(&user_id, USER_TABLE)?;

    let user = state
        .store
        .set_admin(&user_id, input.is_admin)
        .await?
        .ok_or(Error::NotFound)?;

    info!(user_id = %user.id, is_admin = user.is_admin, "admin flag updated");
    Ok(Json(user))
}
