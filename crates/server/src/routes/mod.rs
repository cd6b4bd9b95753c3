use axum::{
    routing::{get, post},
    Router,
};
use shared::api::Object;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::AppState;

mod ping;
pub use ping::*;

pub mod progression;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(Object::Ping.path(), get(ping))
        .route(Object::RpeSchedule.path(), get(progression::rpe_schedule))
        .route(Object::Recommendations.path(), post(progression::recommendations))
        .route(Object::CompleteWorkout.path(), post(progression::complete))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
