use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};

use crate::cli::Cli;

/// The slice of the command line the progression routes need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionSettings {
    pub history_window: usize,
    pub default_set_count: u32,
}

impl From<&Cli> for ProgressionSettings {
    fn from(args: &Cli) -> Self {
        Self {
            history_window: args.history_window,
            default_set_count: args.default_set_count,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProgressionSettings
where
    S: Send + Sync,
    Arc<Cli>: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let args = <Arc<Cli>>::from_ref(state);
        Ok(args.as_ref().into())
    }
}
