use axum::http::StatusCode;

use crate::api::ApiError;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    /// Plain-language mapping for a failed upstream call. Raw transport
    /// detail goes to the log at the call site, not to the client.
    pub fn upstream(err: &ApiError) -> Self {
        let message = match err {
            ApiError::Timeout => "The upstream service took too long to respond.",
            _ => "Could not load data from the upstream service.",
        };
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
