use chrono::{DateTime, Utc};
use rusqlite::Connection;
use shared::{
    model::{CompletedSession, NewCompletedSession, PositionStatus, Programme, ProgrammePosition},
    progression::WorkoutStore,
    types::Uuid,
};
use thiserror::Error;
use tracing::{instrument, trace};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("Programme position {0} is missing or no longer active")]
    PositionNotUpdated(Uuid),
}

/// [`WorkoutStore`] backed by SQLite. Build it over a `Transaction` to make
/// the writes of a workout completion atomic
#[derive(Debug)]
pub struct SqliteWorkoutStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteWorkoutStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl WorkoutStore for SqliteWorkoutStore<'_> {
    type Error = StoreError;

    fn get_active_position(
        &self,
        lifter_id: &Uuid,
    ) -> Result<Option<ProgrammePosition>, Self::Error> {
        Ok(ProgrammePosition::fetch_active_by_lifter_id(self.conn, lifter_id)?)
    }

    fn get_programme(&self, programme_id: &Uuid) -> Result<Option<Programme>, Self::Error> {
        Ok(Programme::fetch_by_id(self.conn, programme_id)?)
    }

    #[instrument(skip(self, position), fields(position_id = %position.id))]
    fn get_recent_sessions(
        &self,
        position: &ProgrammePosition,
        exercise_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<CompletedSession>, Self::Error> {
        let sessions =
            CompletedSession::fetch_recent_with_exercise(self.conn, &position.id, exercise_id, limit)?;
        trace!(count = sessions.len(), "Fetched recent sessions");
        Ok(sessions)
    }

    fn save_completed_session(
        &mut self,
        position: &ProgrammePosition,
        session: NewCompletedSession,
        completed_date: DateTime<Utc>,
    ) -> Result<CompletedSession, Self::Error> {
        Ok(CompletedSession::create(self.conn, position, session, completed_date)?)
    }

    fn update_position(
        &mut self,
        position_id: &Uuid,
        week: u32,
        day: u32,
        status: PositionStatus,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        match ProgrammePosition::update_progress(
            self.conn,
            position_id,
            week,
            day,
            status,
            end_date,
            now,
        )? {
            0 => Err(StoreError::PositionNotUpdated(*position_id)),
            _ => Ok(()),
        }
    }
}
