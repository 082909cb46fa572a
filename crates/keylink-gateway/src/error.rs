use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keylink_core::ManagerError;
use tracing::error;

use crate::model::DetailResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The submitted target URL is not a well-formed absolute URL.
    InvalidUrl,
    /// The request body could not be decoded.
    BadRequest(String),
    /// Nothing (active) behind the requested URL.
    NotFound { requested_url: String },
    /// Anything the client cannot act on. The cause is logged, not returned.
    Internal(String),
}

impl AppError {
    /// Maps a manager outcome, echoing `requested_url` on misses.
    pub fn from_manager(err: ManagerError, requested_url: String) -> Self {
        match err {
            ManagerError::InvalidUrl(_) => AppError::InvalidUrl,
            ManagerError::NotFound(_) => AppError::NotFound { requested_url },
            other @ (ManagerError::KeySpaceExhausted { .. } | ManagerError::Storage(_)) => {
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidUrl => (StatusCode::BAD_REQUEST, "Invalid URL provided".to_string()),
            AppError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            AppError::NotFound { requested_url } => (
                StatusCode::NOT_FOUND,
                format!("URL '{requested_url}' doesn't exist"),
            ),
            AppError::Internal(cause) => {
                error!(cause = %cause, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(DetailResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keylink_core::StorageError;

    #[test]
    fn manager_errors_map_to_statuses() {
        let cases = [
            (ManagerError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ManagerError::NotFound("ABCDE".into()), StatusCode::NOT_FOUND),
            (
                ManagerError::KeySpaceExhausted { attempts: 8 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ManagerError::Storage(StorageError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from_manager(err, "http://testserver/ABCDE".into())
                .into_response();
            assert_eq!(response.status(), status);
        }
    }
}
