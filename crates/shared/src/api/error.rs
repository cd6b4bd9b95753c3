use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Placeholder inner error for routes that have no typed failure modes
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("Nothing")]
pub struct Nothing;

/// Error returned from every API route. `Inner` carries a typed, route
/// specific error and the status code it maps to, everything else is a 500
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerError<T> {
    Inner {
        #[serde(with = "http_serde::status_code")]
        code: StatusCode,
        inner: T,
    },
    Validation {
        inner: ValidationError,
    },
    Database {
        message: String,
    },
    Other {
        message: String,
    },
}

impl<T> ServerError<T> {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Inner { code, .. } => *code,
            ServerError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServerError::Database { .. } | ServerError::Other { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Display for ServerError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Inner { code, inner } => write!(f, "ServerError::Inner {code}: {inner:?}"),
            ServerError::Validation { inner } => write!(f, "ServerError::Validation: {inner}"),
            ServerError::Database { message } => write!(f, "ServerError::Database: {message}"),
            ServerError::Other { message } => write!(f, "ServerError::Other: {message}"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for ServerError<T> {}

impl<T> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Other { message: format!($($arg)*) }
    };
}

#[cfg(feature = "backend")]
mod backend {
    use axum::{
        response::{IntoResponse, Response},
        Json,
    };
    use deadpool_sqlite::{InteractError, PoolError};
    use serde::Serialize;
    use tracing::error;

    use super::ServerError;

    impl<T> From<rusqlite::Error> for ServerError<T> {
        fn from(err: rusqlite::Error) -> Self {
            Self::Database { message: format!("{err:?}") }
        }
    }

    impl<T> From<InteractError> for ServerError<T> {
        fn from(err: InteractError) -> Self {
            Self::Database { message: format!("Connection interact failed: {err:?}") }
        }
    }

    impl<T> From<PoolError> for ServerError<T> {
        fn from(err: PoolError) -> Self {
            Self::Database { message: format!("Connection pool error: {err:?}") }
        }
    }

    impl<T: Serialize + std::fmt::Debug> IntoResponse for ServerError<T> {
        fn into_response(self) -> Response {
            let code = self.status_code();
            if code.is_server_error() {
                error!("{self}");
            }
            (code, Json(self)).into_response()
        }
    }
}
