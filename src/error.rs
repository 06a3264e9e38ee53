use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(String),

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("LLM processing error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Stable name shown to the user next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingConfiguration(_) => "missing_configuration",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::InvalidVideoUrl(_) => "invalid_video_url",
            AppError::FetchError(_) => "fetch_failure",
            AppError::LlmError(_) => "summarization_failure",
            AppError::ConfigError(_) => "configuration_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingConfiguration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidInput(_) | AppError::InvalidVideoUrl(_) => StatusCode::BAD_REQUEST,
            AppError::FetchError(_) | AppError::LlmError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error::<()>(&self).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
