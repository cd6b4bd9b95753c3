use std::fmt;

use axum::http::StatusCode;
use deadpool_sqlite::HookError;

/// Plain text error for the places outside the typed API routes, e.g. the
/// pool hooks
pub struct AppError {
    pub code: StatusCode,
    pub message: String,
}

impl AppError {
    /// Return a plain text response error message
    pub fn new<S: Into<String>>(code: StatusCode, message: S) -> Self {
        AppError { code, message: message.into() }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppError {}: {}", self.code, self.message)
    }
}

impl<E> From<E> for AppError
where
    E: Into<Box<dyn std::error::Error>>,
{
    #[track_caller]
    fn from(err: E) -> Self {
        AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {:?}", err.into()),
        )
    }
}

impl From<AppError> for HookError {
    fn from(err: AppError) -> Self {
        Self::Message(err.to_string())
    }
}

/// Maps any error to a 500 rejection for extractors
pub fn internal_error<E: std::error::Error>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
