use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use banana::errors::RelayError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {env_var}")]
    InvalidEnvVar { env_var: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

// Helper function to format environment variable names
pub fn to_env_var(field_path: &str) -> String {
    // Nested fields are separated by double underscores
    let normalized_path = field_path.replace('.', "__").to_uppercase();
    format!("BANANA_{}", normalized_path)
}

/// Request-level failures, rendered as `{"error": …}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error("No content was generated")]
    EmptyResult,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Relay(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::EmptyResult => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Chatbot API error: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
