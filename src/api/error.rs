//! JSON error responses for the REST API.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::chat::FALLBACK_REPLY;
use crate::error::{GardenError, LlmError};

/// An error rendered as `{"error": ...}` with an optional user-facing `message`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }
}

impl From<GardenError> for ApiError {
    fn from(e: GardenError) -> Self {
        let status = match e {
            GardenError::UserNotFound { .. }
            | GardenError::FriendNotFound { .. }
            | GardenError::PlantNotFound { .. } => StatusCode::NOT_FOUND,
            GardenError::SelfFriendship
            | GardenError::InvalidStatus(_)
            | GardenError::InvalidSize(_) => StatusCode::BAD_REQUEST,
            GardenError::NotFriends { .. } => StatusCode::FORBIDDEN,
        };
        Self::new(status, e.to_string())
    }
}

impl From<LlmError> for ApiError {
    fn from(_: LlmError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Failed to get AI response".to_string(),
            message: Some(FALLBACK_REPLY.to_string()),
        }
    }
}

/// Malformed or incomplete request bodies are client errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.message {
            Some(message) => serde_json::json!({"error": self.error, "message": message}),
            None => serde_json::json!({"error": self.error}),
        };
        (self.status, Json(body)).into_response()
    }
}
