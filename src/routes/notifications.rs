use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{
    errors::{Error, Result},
    middleware::auth::CurrentUser,
    models::notification::{BadgeColor, Notification},
    services::notifications::NotificationInbox,
    state::AppState,
    utils::time::time_now,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxResponse {
    pub unread_count: usize,
    pub badge: BadgeColor,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub success: bool,
    pub unread_count: usize,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<InboxResponse>> {
    let inbox = NotificationInbox::from_rows(state.store.unread_notifications(&user.id).await?);
    Ok(Json(InboxResponse {
        unread_count: inbox.unread_count(),
        badge: inbox.badge(),
        notifications: inbox.into_vec(),
    }))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<String>,
) -> Result<Json<MarkReadResponse>> {
    let mut inbox = NotificationInbox::from_rows(state.store.unread_notifications(&user.id).await?);

    let updated = state
        .store
        .mark_notification_read(&user.id, &notification_id, time_now())
        .await?;
    if !updated {
        return Err(Error::NotFound);
    }
    inbox.acknowledge(&notification_id);

    Ok(Json(MarkReadResponse {
        success: true,
        unread_count: inbox.unread_count(),
    }))
}
