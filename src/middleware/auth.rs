use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    consts::http_const::ACCESS_TOKEN_COOKIE,
    errors::{Error, Result as RResult},
    models::user::User,
    state::AppState,
    utils::{cookies::cookie_value, jwt::decode_jwt},
};

/// The authenticated user, inserted by the session middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn auth_jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, Response> {
    let user = resolve_session(&state, request.headers())
        .await
        .map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Bearer header first, then the session cookie. `Ok(None)` means the
/// request carries no credentials at all.
pub fn session_token(headers: &HeaderMap) -> RResult<Option<String>> {
    let Some(header_value) = headers.get(AUTHORIZATION) else {
        return Ok(cookie_value(headers, ACCESS_TOKEN_COOKIE));
    };
    let header_value = header_value.to_str().map_err(|_| Error::InvalidToken)?;

    let mut parts = header_value.trim().splitn(2, ' ');

    let scheme = parts.next().ok_or(Error::MissingToken)?;
    let token = parts
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::MissingToken)?;

    if scheme != "Bearer" {
        tracing::warn!("Invalid auth scheme: {scheme}");
        return Err(Error::InvalidScheme);
    }

    Ok(Some(token.to_string()))
}

pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> RResult<User> {
    let token = session_token(headers)?.ok_or(Error::MissingToken)?;
    let claims = decode_jwt(&token, &state.config.session_jwt_secret)?.claims;

    match state.store.get_user(&claims.sub).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(Error::Unauthenticated),
        Err(Error::InvalidRecordId(_)) => Err(Error::InvalidToken),
        Err(e) => Err(e),
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> RResult<Self> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(Error::Unauthenticated)
    }
}
