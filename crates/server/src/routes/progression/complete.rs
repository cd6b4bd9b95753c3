use axum::Json;
use chrono::Utc;
use rusqlite::TransactionBehavior;
use shared::{
    api::{
        error::ServerError,
        payloads::{CompleteWorkoutRequest, CompleteWorkoutResponse},
        response_errors::CompleteWorkoutError,
    },
    model::{NewCompletedSession, ValidateModel},
    progression::complete_workout,
};
use tracing::instrument;

use crate::db::{DatabaseConnection, SqliteWorkoutStore};

#[instrument(skip(conn, req), fields(lifter_id = %req.lifter_id))]
pub async fn complete(
    DatabaseConnection(conn): DatabaseConnection,
    Json(req): Json<CompleteWorkoutRequest>,
) -> Result<Json<CompleteWorkoutResponse>, ServerError<CompleteWorkoutError>> {
    req.validate()?;
    let CompleteWorkoutRequest { lifter_id, exercises, duration_minutes, notes } = req;
    let session = NewCompletedSession { exercises, duration_minutes, notes };

    let completion = conn
        .interact(move |conn| {
            // Take the write lock up front so concurrent completions for the
            // same lifter can't both read the old position
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let completion =
                complete_workout(&mut SqliteWorkoutStore::new(&tx), &lifter_id, session, Utc::now())?;
            tx.commit()?;

            Ok::<_, ServerError<CompleteWorkoutError>>(completion)
        })
        .await??;

    Ok(Json(CompleteWorkoutResponse {
        session_id: completion.session.id,
        position: completion.position,
    }))
}
