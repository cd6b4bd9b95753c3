use axum::{extract::Path, Json};
use shared::{
    api::{error::ServerError, response_errors::RpeScheduleError},
    progression,
};

pub async fn rpe_schedule(
    Path(weeks): Path<u32>,
) -> Result<Json<Vec<u8>>, ServerError<RpeScheduleError>> {
    let schedule = progression::rpe_schedule(weeks)?;
    Ok(Json(schedule.into()))
}
