//! Access gate for the admin area. Page navigation is redirected, admin
//! API calls get a hard error.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::{
    consts::{
        http_const::{ADMIN_TOKEN_HEADER, HOME_PATH, LOGIN_PATH},
        rules_const::ADMIN_GATE_READY_TIMEOUT,
    },
    errors::Error,
    middleware::auth::{CurrentUser, resolve_session},
    models::user::User,
    state::AppState,
    utils::digest::secrets_match,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectToLogin,
    RedirectToHome,
}

/// `/admin` itself or anything below `/admin/`.
pub fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

pub fn evaluate(path: &str, session: Option<&User>) -> GateDecision {
    if !is_admin_path(path) {
        return GateDecision::Proceed;
    }
    match session {
        None => GateDecision::RedirectToLogin,
        Some(user) if !user.is_admin => GateDecision::RedirectToHome,
        Some(_) => GateDecision::Proceed,
    }
}

fn evaluate_api(session: Option<&User>) -> GateDecision {
    evaluate("/admin", session)
}

/// Waits for the store to come up, then resolves the session. A store
/// failure is returned, anything else reads as anonymous.
async fn gate_session(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, Error> {
    if !state.readiness.wait(ADMIN_GATE_READY_TIMEOUT).await {
        warn!("store not ready after {ADMIN_GATE_READY_TIMEOUT:?}, resolving session anyway");
    }

    match resolve_session(state, headers).await {
        Ok(user) => Ok(Some(user)),
        Err(e) if e.status().is_server_error() => Err(e),
        Err(e) => {
            debug!("admin gate sees anonymous session: {e}");
            Ok(None)
        }
    }
}

fn attach(request: &mut Request, user: User) {
    request.extensions_mut().insert(CurrentUser(user));
}

pub async fn admin_page_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !is_admin_path(&path) {
        return next.run(request).await;
    }

    let session = match gate_session(&state, request.headers()).await {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    match evaluate(&path, session.as_ref()) {
        GateDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        GateDecision::RedirectToHome => {
            debug!(path, "non-admin redirected home");
            Redirect::to(HOME_PATH).into_response()
        }
        GateDecision::Proceed => {
            if let Some(user) = session {
                attach(&mut request, user);
            }
            next.run(request).await
        }
    }
}

pub async fn admin_api_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let presented = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Some(token) = presented {
        if secrets_match(token, &state.config.admin_token_secret) {
            return Ok(next.run(request).await);
        }
        warn!("rejected admin token");
        return Err(Error::AdminRequired);
    }

    let session = gate_session(&state, request.headers()).await?;
    match evaluate_api(session.as_ref()) {
        GateDecision::RedirectToLogin => Err(Error::Unauthenticated),
        GateDecision::RedirectToHome => Err(Error::AdminRequired),
        GateDecision::Proceed => {
            if let Some(user) = session {
                attach(&mut request, user);
            }
            Ok(next.run(request).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::memory::fixtures::user;

    #[test]
    fn only_admin_prefixed_paths_are_gated() {
        assert!(is_admin_path("/admin"));
        assert!(is_admin_path("/admin/users"));
        assert!(!is_admin_path("/administrator"));
        assert!(!is_admin_path("/api/admin/users"));
        assert_eq!(evaluate("/dashboard", None), GateDecision::Proceed);
    }

    #[test]
    fn sessions_map_to_decisions() {
        let athlete = user("kid@example.com", false, Utc::now());
        let admin = user("ops@example.com", true, Utc::now());

        assert_eq!(evaluate("/admin/users", None), GateDecision::RedirectToLogin);
        assert_eq!(
            evaluate("/admin/users", Some(&athlete)),
            GateDecision::RedirectToHome
        );
        assert_eq!(evaluate("/admin", Some(&admin)), GateDecision::Proceed);
    }
}
