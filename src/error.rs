// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ChatResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing parameters")]
    MissingParameters,

    /// The backend rejected the chat creation call or returned a malformed
    /// envelope. Carries the backend's own message when it supplied one.
    #[error("chat submission rejected: {0}")]
    Submission(String),

    /// The backend reported a terminal non-success status ("failed" or
    /// "canceled").
    #[error("chat processing {0}")]
    Processing(String),

    #[error("timeout: chat not completed after {0} status checks")]
    Timeout(u32),

    #[error("assistant answer not found in message list")]
    NotFound,

    #[error("backend request error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingParameters => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(status = %status, error = %self, "chat request failed");
        (status, Json(ChatResponse::failure(self.to_string()))).into_response()
    }
}
