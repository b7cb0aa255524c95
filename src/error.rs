//! Error taxonomy for the bookmaker core.
//!
//! Every publicly-surfaced error is tagged with one of three RPC codes. The
//! shape mirrors the teacher's `auth::middleware::AuthError`: a small enum,
//! one `IntoResponse` impl, one place that decides the status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookmakerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BookmakerError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The RPC code this error maps to, per spec §7/§4.8.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<anyhow::Error> for BookmakerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for BookmakerError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BookmakerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(BookmakerError::invalid_argument("x").code(), "INVALID_ARGUMENT");
        assert_eq!(BookmakerError::not_found("x").code(), "NOT_FOUND");
        assert_eq!(BookmakerError::internal("x").code(), "INTERNAL");
    }

    #[test]
    fn status_codes_match_taxonomy() {
        let resp = BookmakerError::invalid_argument("bad").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = BookmakerError::not_found("missing").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = BookmakerError::internal("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
