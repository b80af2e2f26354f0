use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::errors::Error;

/// Result of a business operation whose failures must not break the
/// caller's flow. Soft failures still answer 200.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    SoftFailure(String),
    HardFailure(Error),
}

impl<T> From<Error> for Outcome<T> {
    fn from(error: Error) -> Self {
        Outcome::HardFailure(error)
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        match self {
            Outcome::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            Outcome::SoftFailure(message) => (
                StatusCode::OK,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            Outcome::HardFailure(error) => error.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_failure_is_ok_status() {
        let response = Outcome::<()>::SoftFailure("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn hard_failure_keeps_error_status() {
        let response = Outcome::<()>::HardFailure(Error::Unauthenticated).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
