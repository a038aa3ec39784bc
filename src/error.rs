use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::lastfm::UpstreamError;
use crate::roster::DeriveError;

// Terminal request errors. Nothing here is retried; every kind maps to one
// status and a json body with a human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing '{0}'")]
    MissingParameter(&'static str),

    #[error("Too many requests")]
    RateLimited,

    #[error("api key missing")]
    MissingApiKey,

    #[error("unknown period '{0}'")]
    InvalidPeriod(String),

    #[error(transparent)]
    Selection(#[from] DeriveError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
            ApiError::Selection(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MissingParameter("user").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidPeriod("2week".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_messages_are_not_empty() {
        assert!(!ApiError::MissingParameter("user").to_string().is_empty());
        assert!(!ApiError::RateLimited.to_string().is_empty());
    }
}
