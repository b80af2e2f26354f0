use axum::{
    extract::Request,
    http::{HeaderMap, Method, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{
    consts::http_const::{ACCESS_TOKEN_COOKIE, CSRF_COOKIE, CSRF_EXEMPT_PREFIXES, CSRF_HEADER},
    errors::{Error, Result},
    utils::{cookies::cookie_value, digest::secrets_match},
};

pub fn is_exempt(path: &str) -> bool {
    CSRF_EXEMPT_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

fn is_unsafe(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Only cookie-authenticated state changes are exposed to cross-site
/// forgery; bearer requests are not.
pub fn needs_check(method: &Method, path: &str, headers: &HeaderMap) -> bool {
    is_unsafe(method)
        && !is_exempt(path)
        && !headers.contains_key(AUTHORIZATION)
        && cookie_value(headers, ACCESS_TOKEN_COOKIE).is_some()
}

/// Double-submit check: header must repeat the cookie.
pub fn verify(headers: &HeaderMap) -> Result<()> {
    let cookie = cookie_value(headers, CSRF_COOKIE).ok_or(Error::CsrfRejected)?;
    let header = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::CsrfRejected)?;

    if secrets_match(header.trim(), &cookie) {
        Ok(())
    } else {
        Err(Error::CsrfRejected)
    }
}

pub async fn csrf_middleware(request: Request, next: Next) -> Result<Response> {
    if needs_check(request.method(), request.uri().path(), request.headers()) {
        verify(request.headers())?;
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn cookie_headers(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn cookie_sessions_on_unsafe_methods_are_checked() {
        let headers = cookie_headers("access_token=jwt");
        assert!(needs_check(&Method::POST, "/api/tasks", &headers));
        assert!(!needs_check(&Method::GET, "/api/tasks", &headers));
        assert!(!needs_check(&Method::POST, "/api/cron/surface-suggestions", &headers));
    }

    #[test]
    fn bearer_requests_are_not_checked() {
        let mut headers = cookie_headers("access_token=jwt");
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer jwt"));
        assert!(!needs_check(&Method::POST, "/api/tasks", &headers));
    }

    #[test]
    fn header_must_match_cookie() {
        let mut headers = cookie_headers("access_token=jwt; csrf_token=tok123");
        assert!(matches!(verify(&headers), Err(Error::CsrfRejected)));

        headers.insert(CSRF_HEADER, HeaderValue::from_static("other"));
        assert!(matches!(verify(&headers), Err(Error::CsrfRejected)));

        headers.insert(CSRF_HEADER, HeaderValue::from_static("tok123"));
        assert!(verify(&headers).is_ok());
    }
}
