use axum::Json;
use shared::{
    api::{
        error::ServerError,
        payloads::{RecommendationRequest, RecommendationResponse},
        response_errors::RecommendationError,
    },
    model::ValidateModel,
    progression::recommend_batch,
};
use tracing::instrument;

use crate::{
    db::{DatabaseConnection, SqliteWorkoutStore},
    ProgressionSettings,
};

#[instrument(skip(conn))]
pub async fn recommendations(
    DatabaseConnection(conn): DatabaseConnection,
    settings: ProgressionSettings,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ServerError<RecommendationError>> {
    req.validate()?;
    let set_count = req.set_count.unwrap_or(settings.default_set_count);

    let recommendations = conn
        .interact(move |conn| {
            let store = SqliteWorkoutStore::new(conn);
            let recommendations = recommend_batch(
                &store,
                &req.lifter_id,
                &req.exercise_ids,
                set_count,
                settings.history_window,
            )?;
            Ok::<_, ServerError<RecommendationError>>(recommendations)
        })
        .await??;

    Ok(Json(RecommendationResponse { recommendations }))
}
