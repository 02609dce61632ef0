use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Generic message returned for every failed recommendation call
pub const RECOMMENDATION_FAILED: &str = "Failed to get recommendations.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("API key is not configured on the server.")]
    MissingApiKey,

    #[error("{0}")]
    InvalidInput(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Gemini API failed with status: {status}. Body: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response structure from Gemini API: {0}")]
    InvalidResponse(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey
            | AppError::HttpClient(_)
            | AppError::Upstream { .. }
            | AppError::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::MethodNotAllowed | AppError::MissingApiKey | AppError::InvalidInput(_) => {
                json!({ "message": self.to_string() })
            }
            AppError::HttpClient(_) | AppError::Upstream { .. } | AppError::InvalidResponse(_) => {
                json!({
                    "message": RECOMMENDATION_FAILED,
                    "error": self.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
