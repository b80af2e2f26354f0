use axum::{Json, http::StatusCode, response::IntoResponse};
use jsonwebtoken::errors::{Error as JWError, ErrorKind as JWErrorKind};
use serde_json::json;
use surrealdb::Error as SError;

use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Jason web token Error: {0}")]
    JwTError(#[from] JWError),

    #[error("SurrealDb Error: {0}")]
    SurrealError(#[from] SError),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validator Error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Json Rejection Error: {0}")]
    AxumJsonRejection(#[from] axum::extract::rejection::JsonRejection),

    #[error("Query Rejection Error: {0}")]
    AxumQueryRejection(#[from] axum::extract::rejection::QueryRejection),

    // ! Boot
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
    #[error("invalid value for environment variable {0}: {1}")]
    InvalidEnv(String, String),

    // ! Store
    #[error("Store Error: {0}")]
    Store(String),
    #[error("Invalid record id `{0}`")]
    InvalidRecordId(String),

    // ! Domain
    #[error("batch size must be a positive integer")]
    InvalidBatchSize,
    #[error("{0}")]
    Custom(String),
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error")]
    InternalServerError,

    // ! Auth
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Invalid authorization scheme")]
    InvalidScheme,
    #[error("Token expired")]
    TokenExpired,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Admin access required")]
    AdminRequired,
    #[error("CSRF token missing or invalid")]
    CsrfRejected,
}

impl Error {
    /// Maps a JWT decoding failure onto the auth tier.
    pub fn from_jwt(error: JWError) -> Self {
        match error.kind() {
            JWErrorKind::ExpiredSignature => Error::TokenExpired,
            _ => Error::InvalidToken,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::ValidationError(_)
            | Error::AxumJsonRejection(_)
            | Error::AxumQueryRejection(_)
            | Error::InvalidRecordId(_)
            | Error::InvalidBatchSize
            | Error::Custom(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingToken
            | Error::InvalidToken
            | Error::InvalidScheme
            | Error::TokenExpired
            | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::AdminRequired | Error::CsrfRejected => StatusCode::FORBIDDEN,
            Error::JwTError(_)
            | Error::SurrealError(_)
            | Error::IoError(_)
            | Error::MissingEnv(_)
            | Error::InvalidEnv(..)
            | Error::Store(_)
            | Error::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            Error::JwTError(_)
            | Error::SurrealError(_)
            | Error::IoError(_)
            | Error::MissingEnv(_)
            | Error::InvalidEnv(..)
            | Error::Store(_)
            | Error::InternalServerError => {
                error!("Internal Error:{:#?}", self);
                "Internal Error".to_string()
            }
            Error::ValidationError(error) => {
                warn!("Validation Error:{:#?}", error);
                format!("Input validation error: [{}]", error).replace('\n', ", ")
            }
            Error::AxumJsonRejection(error) => {
                warn!("Axum Json Rejection Error:{:#?}", error);
                error.body_text()
            }
            Error::AxumQueryRejection(error) => {
                warn!("Axum Query Rejection Error:{:#?}", error);
                error.body_text()
            }
            Error::MissingToken
            | Error::InvalidToken
            | Error::InvalidScheme
            | Error::TokenExpired
            | Error::Unauthenticated
            | Error::AdminRequired
            | Error::CsrfRejected => {
                warn!("Rejected request: {}", self);
                self.to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_lists_names_in_order() {
        let err = Error::MissingEnv(vec!["PROVIDER_URL".into(), "CRON_SECRET".into()]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PROVIDER_URL, CRON_SECRET"
        );
    }

    #[test]
    fn auth_tier_maps_to_hard_statuses() {
        assert_eq!(Error::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::AdminRequired.status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::CsrfRejected.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::Store("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
