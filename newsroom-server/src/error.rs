use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use newsroom_core::auth::AuthError;
use newsroom_core::NewsError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    News(NewsError),
    Auth(AuthError),
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn parts(self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorBody::new(message)),
            ApiError::Auth(err) => {
                let status = match &err {
                    AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                    AuthError::InvalidToken => StatusCode::BAD_REQUEST,
                    AuthError::Hash(_) | AuthError::Sign(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, ErrorBody::new(err.to_string()))
            }
            ApiError::News(err) => match err {
                NewsError::MissingApiKey => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Missing news API key in environment"),
                ),
                NewsError::UserNotFound => {
                    (StatusCode::NOT_FOUND, ErrorBody::new("User not found"))
                }
                NewsError::NoPreferences => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("No preferences found"),
                ),
                NewsError::UserExists => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("User already exists"),
                ),
                NewsError::InvalidPreferences => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new(
                        "Invalid preferences format. 'categories' and 'languages' must be arrays of non-empty strings.",
                    ),
                ),
                NewsError::EmptyKeyword => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("Keyword is required"),
                ),
                NewsError::Upstream { status, body } => (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    ErrorBody {
                        message: "Failed to fetch news".to_owned(),
                        error: Some(body),
                    },
                ),
                NewsError::UpstreamFormat => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new("Invalid response from news provider"),
                ),
                NewsError::Network(_) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new("News provider is unreachable"),
                ),
                NewsError::Io(_) | NewsError::Serialization(_) | NewsError::Task(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Unexpected server error"),
                ),
            },
        }
    }
}

impl From<NewsError> for ApiError {
    fn from(err: NewsError) -> Self {
        Self::News(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        if status.is_server_error() {
            tracing::error!(status = %status, message = %body.message, "request failed");
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let cases = [
            (NewsError::MissingApiKey, StatusCode::INTERNAL_SERVER_ERROR),
            (NewsError::UserNotFound, StatusCode::NOT_FOUND),
            (NewsError::NoPreferences, StatusCode::BAD_REQUEST),
            (NewsError::EmptyKeyword, StatusCode::BAD_REQUEST),
            (NewsError::UpstreamFormat, StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            let (status, _) = ApiError::News(err).parts();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn upstream_error_carries_status_and_body() {
        let err = ApiError::News(NewsError::Upstream {
            status: 429,
            body: "rate limited".to_owned(),
        });
        let (status, body) = err.parts();
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body.message, "Failed to fetch news");
        assert_eq!(body.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        let (status, _) = ApiError::Auth(AuthError::MissingToken).parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = ApiError::Auth(AuthError::InvalidToken).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
