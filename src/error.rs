use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use yurline_shared::{Error, ErrorCode};

/// Message the relay returns for anything that went wrong past validation.
pub const INTERNAL_MESSAGE: &str = "Failed to send message";

/// Relay function failure, rendered as `{success, error, code}` JSON.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AppError(#[from] pub Error);

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self(Error::InvalidArgument(message.into()))
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self(Error::FailedPrecondition(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self(Error::Internal(message.into()))
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code()
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let error = match &self.0 {
            Error::Internal(_) => {
                tracing::error!(error = %self.0, "Relay function failed");
                INTERNAL_MESSAGE.to_string()
            }
            err => err.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error,
                code,
            }),
        )
            .into_response()
    }
}
