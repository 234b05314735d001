use reqwest::StatusCode;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Timeout, refused connection or any other transport failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Request failed with status code {}", .status.as_u16())]
    Http { status: StatusCode, body: String },

    /// Body could not be decoded into the expected envelope
    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Status code of an HTTP failure, if this is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            AppError::Network(e) => e.status(),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
