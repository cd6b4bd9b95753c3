use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::WorkoutStore;
use crate::{
    model::{CompletedSession, NewCompletedSession, PositionStatus, Programme, ProgrammePosition},
    types::Uuid,
};

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("History for exercise {0} is unavailable")]
    ReadFailed(Uuid),
    #[error("Position {0} was not updated")]
    NotUpdated(Uuid),
}

/// In-memory [`WorkoutStore`] for exercising the progression logic without
/// SQLite
#[derive(Debug, Default)]
pub struct MemoryStore {
    programmes: HashMap<Uuid, Programme>,
    positions: Vec<ProgrammePosition>,
    sessions: Vec<CompletedSession>,
    failing_exercises: HashSet<Uuid>,
    reject_updates: bool,
}

impl MemoryStore {
    /// Enrolls a new lifter in a new programme
    pub fn enroll(&mut self, days_per_week: u32, duration_weeks: u32) -> (Uuid, ProgrammePosition) {
        let lifter_id = Uuid::new_v4();
        let position = self.enroll_lifter(lifter_id, days_per_week, duration_weeks);
        (lifter_id, position)
    }

    pub fn enroll_lifter(
        &mut self,
        lifter_id: Uuid,
        days_per_week: u32,
        duration_weeks: u32,
    ) -> ProgrammePosition {
        let programme = Programme::new("Test programme", days_per_week, duration_weeks);
        let position = ProgrammePosition::enroll(lifter_id, programme.id);
        self.programmes.insert(programme.id, programme);
        self.positions.push(position.clone());
        position
    }

    pub fn position(&self, position_id: &Uuid) -> Option<ProgrammePosition> {
        self.positions.iter().find(|p| &p.id == position_id).cloned()
    }

    fn position_mut(&mut self, position_id: &Uuid) -> Option<&mut ProgrammePosition> {
        self.positions.iter_mut().find(|p| &p.id == position_id)
    }

    pub fn set_week(&mut self, position_id: &Uuid, week: u32) {
        if let Some(position) = self.position_mut(position_id) {
            position.current_week = week;
        }
    }

    pub fn cancel(&mut self, position_id: &Uuid) {
        if let Some(position) = self.position_mut(position_id) {
            position.status = PositionStatus::Cancelled;
        }
    }

    /// Logs a session with an explicit completion time
    pub fn push_session(
        &mut self,
        position: &ProgrammePosition,
        completed_date: DateTime<Utc>,
        session: NewCompletedSession,
    ) -> CompletedSession {
        let session = CompletedSession {
            id: Uuid::new_v4(),
            position_id: position.id,
            week: position.current_week,
            day: position.current_day,
            completed_date,
            duration_minutes: session.duration_minutes,
            notes: session.notes,
            exercises: session.exercises,
        };
        self.sessions.push(session.clone());
        session
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// History reads for `exercise_id` fail from now on
    pub fn fail_reads_for(&mut self, exercise_id: Uuid) {
        self.failing_exercises.insert(exercise_id);
    }

    pub fn fail_position_updates(&mut self) {
        self.reject_updates = true;
    }
}

impl WorkoutStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get_active_position(
        &self,
        lifter_id: &Uuid,
    ) -> Result<Option<ProgrammePosition>, Self::Error> {
        Ok(self.positions.iter().find(|p| &p.lifter_id == lifter_id && p.is_active()).cloned())
    }

    fn get_programme(&self, programme_id: &Uuid) -> Result<Option<Programme>, Self::Error> {
        Ok(self.programmes.get(programme_id).cloned())
    }

    fn get_recent_sessions(
        &self,
        position: &ProgrammePosition,
        exercise_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<CompletedSession>, Self::Error> {
        if self.failing_exercises.contains(exercise_id) {
            return Err(MemoryStoreError::ReadFailed(*exercise_id));
        }

        let mut sessions: Vec<CompletedSession> = self
            .sessions
            .iter()
            .filter(|s| s.position_id == position.id && s.contains_exercise(exercise_id))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.completed_date);
        let skip = sessions.len().saturating_sub(limit);
        Ok(sessions.split_off(skip))
    }

    fn save_completed_session(
        &mut self,
        position: &ProgrammePosition,
        session: NewCompletedSession,
        completed_date: DateTime<Utc>,
    ) -> Result<CompletedSession, Self::Error> {
        Ok(self.push_session(position, completed_date, session))
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
        if self.reject_updates {
            return Err(MemoryStoreError::NotUpdated(*position_id));
        }

        let position = self
            .position_mut(position_id)
            .filter(|p| p.is_active())
            .ok_or(MemoryStoreError::NotUpdated(*position_id))?;
        position.current_week = week;
        position.current_day = day;
        position.status = status;
        position.end_date = end_date;
        position.last_updated_date = now;
        Ok(())
    }
}
