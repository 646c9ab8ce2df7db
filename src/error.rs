use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A single provider failed: transport error, unparseable body or empty payload.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Primary and secondary providers both failed. Terminal for an evaluation.
    #[error("All price providers exhausted: {0}")]
    AllProvidersExhausted(String),

    /// Fewer samples than an indicator needs.
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// Sink not configured or delivery failed. Never invalidates a recommendation.
    #[error("Notification unavailable: {0}")]
    NotificationUnavailable(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl AppError {
    /// HTTP status used when this error reaches the API layer.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ProviderUnavailable(_) | AppError::AllProvidersExhausted(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::InsufficientHistory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotificationUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Reqwest(_) => StatusCode::BAD_GATEWAY,
            AppError::SerdeJson(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
