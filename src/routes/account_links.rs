use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    errors::{Error, Result},
    middleware::auth::CurrentUser,
    models::{
        account_link::{AccountLink, AccountLinkStatus, NewAccountLink},
        user::{User, UserSummary},
    },
    state::AppState,
    utils::{
        time::time_now,
        validated_form::{ValidatedJson, ValidatedQuery},
    },
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckUserResponse {
    pub exists: bool,
    pub user: Option<UserSummary>,
}

fn reject_self(user: &User, email: &str) -> Result<()> {
    if user.email.eq_ignore_ascii_case(email.trim()) {
        return Err(Error::Custom(
            "You cannot link your account to itself".to_string(),
        ));
    }
    Ok(())
}

pub async fn check_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(input): ValidatedQuery<EmailRequest>,
) -> Result<Json<CheckUserResponse>> {
    reject_self(&user, &input.email)?;

    let found = state.store.find_user_by_email(input.email.trim()).await?;
    Ok(Json(CheckUserResponse {
        exists: found.is_some(),
        user: found.as_ref().map(UserSummary::from),
    }))
}

pub async fn create_account_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<EmailRequest>,
) -> Result<(StatusCode, Json<AccountLink>)> {
    reject_self(&user, &input.email)?;

    let email = input.email.trim().to_lowercase();
    let invitee = state.store.find_user_by_email(&email).await?;

    let link = state
        .store
        .create_account_link(NewAccountLink {
            requester_id: user.id,
            invitee_email: email,
            invitee_id: invitee.map(|u| u.id),
            status: AccountLinkStatus::Pending,
            created_at: time_now(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn list_account_links(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AccountLink>>> {
    Ok(Json(state.store.list_account_links(&user.id).await?))
}
