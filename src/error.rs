use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::auth::{dto::MessageResponse, services::AccountError};

/// JSON `{"message": ...}` error returned by the API routes. Never carries
/// internal detail such as paths or error chains.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidInput => Self::new(
                StatusCode::BAD_REQUEST,
                "Invalid email or password (min length 6).",
            ),
            AccountError::MissingCredentials => {
                Self::new(StatusCode::BAD_REQUEST, "Email and password required")
            }
            AccountError::AlreadyExists => Self::new(StatusCode::CONFLICT, "Email already exists"),
            AccountError::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AccountError::Storage(e) => {
                error!(error = %e, "account storage failure");
                Self::internal()
            }
            AccountError::Internal(e) => {
                error!(error = %e, "account internal failure");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageResponse::new(self.message))).into_response()
    }
}
