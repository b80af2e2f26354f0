use axum::{extract::State, http::HeaderMap, http::header::AUTHORIZATION};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    errors::{Error, Result},
    outcome::Outcome,
    services::suggestions::{BatchSize, surface_pending},
    state::AppState,
    utils::{digest::secrets_match, time::time_now},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronSurfaceResponse {
    pub success: bool,
    pub users_processed: usize,
    pub surfaced_count: usize,
    pub failures: usize,
}

fn authorize_cron(headers: &HeaderMap, secret: &str) -> Result<()> {
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(Error::MissingToken)?;

    if !secrets_match(presented, secret) {
        warn!("Rejected cron call with a bad secret");
        return Err(Error::InvalidToken);
    }
    Ok(())
}

/// Surfaces a batch for every user with pending suggestions. One user's
/// failure is counted and the run continues; a failed owner lookup is a
/// soft failure for the whole run.
pub async fn cron_surface_suggestions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Outcome<CronSurfaceResponse> {
    if let Err(e) = authorize_cron(&headers, &state.config.cron_secret) {
        return e.into();
    }

    let user_ids = match state.store.users_with_pending_suggestions().await {
        Ok(user_ids) => user_ids,
        Err(e) => {
            error!("cron could not list users with pending suggestions: {e}");
            return Outcome::SoftFailure("Could not load pending suggestions".to_string());
        }
    };
    let now = time_now();
    let size = BatchSize::standard();

    let mut surfaced_count = 0;
    let mut failures = 0;
    for user_id in &user_ids {
        match surface_pending(state.store.as_ref(), user_id, size, now).await {
            Ok(n) => surfaced_count += n,
            Err(e) => {
                error!(user_id = %user_id, "cron surfacing failed: {e}");
                failures += 1;
            }
        }
    }

    info!(
        users = user_ids.len(),
        surfaced_count, failures, "cron surfacing finished"
    );
    Outcome::Success(CronSurfaceResponse {
        success: true,
        users_processed: user_ids.len(),
        surfaced_count,
        failures,
    })
}
