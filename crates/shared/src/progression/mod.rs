//! Autoregulated progression: picks the load, reps and effort for a lifter's
//! next session from their recent history, and walks their position through
//! a periodised programme.
//!
//! Everything here is synchronous and request scoped. Data access goes
//! through [`WorkoutStore`] so the pure parts ([`rpe_schedule`],
//! [`volume_preserving_reps`], [`best_set`] and the rule table) can be tested
//! without a database.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    model::{CompletedSession, NewCompletedSession, PositionStatus, Programme, ProgrammePosition},
    types::Uuid,
};

mod rpe;
pub use rpe::*;

mod volume;
pub use volume::*;

mod history;
pub use history::*;

mod engine;
pub use engine::*;

mod advancement;
pub use advancement::*;

#[cfg(test)]
pub(crate) mod memory_store;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressionError {
    #[error("Programme length must be at least one week, got {weeks}")]
    InvalidProgramLength { weeks: u32 },
    #[error("Load must be a positive number, got {load}")]
    InvalidLoad { load: f64 },
    #[error("Lifter {lifter_id} has no active programme")]
    NoActiveProgramme { lifter_id: Uuid },
    #[error("Programme {programme_id} does not exist")]
    ProgrammeNotFound { programme_id: Uuid },
    #[error("Programme position {position_id} is {status}, expected ACTIVE")]
    PositionNotActive { position_id: Uuid, status: PositionStatus },
    #[error("Workout store error: {message}")]
    Store { message: String },
}

impl ProgressionError {
    pub fn store<E: std::error::Error>(err: E) -> Self {
        Self::Store { message: err.to_string() }
    }
}

/// Read/write contract the engine needs from whatever persists workouts
pub trait WorkoutStore {
    type Error: std::error::Error;

    fn get_active_position(
        &self,
        lifter_id: &Uuid,
    ) -> Result<Option<ProgrammePosition>, Self::Error>;

    fn get_programme(&self, programme_id: &Uuid) -> Result<Option<Programme>, Self::Error>;

    /// Up to `limit` of the most recent sessions logged against `position`
    /// that include `exercise_id`, oldest first
    fn get_recent_sessions(
        &self,
        position: &ProgrammePosition,
        exercise_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<CompletedSession>, Self::Error>;

    /// Persists a workout stamped with the position's current week and day,
    /// completed at `completed_date`
    fn save_completed_session(
        &mut self,
        position: &ProgrammePosition,
        session: NewCompletedSession,
        completed_date: DateTime<Utc>,
    ) -> Result<CompletedSession, Self::Error>;

    /// Must fail rather than silently do nothing if the position could not be
    /// updated
    fn update_position(
        &mut self,
        position_id: &Uuid,
        week: u32,
        day: u32,
        status: PositionStatus,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), Self::Error>;
}

/// Resolves the lifter's active position, missing is an error
pub fn active_position<S: WorkoutStore>(
    store: &S,
    lifter_id: &Uuid,
) -> Result<ProgrammePosition, ProgressionError> {
    store
        .get_active_position(lifter_id)
        .map_err(ProgressionError::store)?
        .ok_or(ProgressionError::NoActiveProgramme { lifter_id: *lifter_id })
}

pub(crate) fn programme_for<S: WorkoutStore>(
    store: &S,
    position: &ProgrammePosition,
) -> Result<Programme, ProgressionError> {
    store
        .get_programme(&position.programme_id)
        .map_err(ProgressionError::store)?
        .ok_or(ProgressionError::ProgrammeNotFound { programme_id: position.programme_id })
}
