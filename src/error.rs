use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    FetchError(String),

    #[error("{0}")]
    ExtractionError(String),

    #[error("Model invocation failed: {0}")]
    ModelError(String),

    #[error("Unusable model output: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Client-facing failures carry their message to the caller; everything
    /// else is reported as a server error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::FetchError(_) | AppError::ExtractionError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::ModelError(_) | AppError::ParseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the client. Server-side failures are replaced
    /// by `generic` so internal details never leak.
    pub fn client_message(&self, generic: &str) -> String {
        if self.status_code().is_client_error() {
            self.to_string()
        } else {
            generic.to_string()
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(format!("Failed to access website: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
