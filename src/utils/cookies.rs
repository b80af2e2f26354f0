use axum::http::{HeaderMap, header::COOKIE};

/// Returns the first non-empty value of cookie `name` across all `Cookie`
/// headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc.def; csrf_token=xyz"),
        );
        assert_eq!(cookie_value(&headers, "access_token").as_deref(), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "csrf_token").as_deref(), Some("xyz"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_values_do_not_count() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("csrf_token="));
        assert_eq!(cookie_value(&headers, "csrf_token"), None);
    }
}
