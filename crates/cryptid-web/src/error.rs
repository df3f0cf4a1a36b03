//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cryptid_db::DbError;
use cryptid_service::ServiceError;

/// Detail returned with every 401.
const UNAUTHORIZED_DETAIL: &str = "Incorrect username or password";

/// Errors that can occur in the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The record's key is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No valid session, or bad credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The request body failed field validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request could not be extracted (bad body, content type, or
    /// query string). Keeps the status axum chose.
    #[error("rejected request: {detail}")]
    Rejected {
        /// Status to answer with.
        status: StatusCode,
        /// Why the request was rejected.
        detail: String,
    },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Db(DbError::Missing(msg)) => Self::NotFound(msg),
            ServiceError::Db(DbError::Duplicate(msg)) => Self::Conflict(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::Rejected {
                        status: rejection.status(),
                        detail: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, FormRejection, QueryRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_DETAIL.to_owned()),
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::Rejected { status, detail } => (*status, detail.clone()),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = serde_json::json!({
            "detail": message,
            "status": status.as_u16(),
        });

        if matches!(self, Self::Unauthorized) {
            (status, [(WWW_AUTHENTICATE, "Bearer")], axum::Json(body)).into_response()
        } else {
            (status, axum::Json(body)).into_response()
        }
    }
}
