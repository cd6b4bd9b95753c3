use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{active_position, programme_for, ProgressionError, WorkoutStore};
use crate::{
    model::{CompletedSession, NewCompletedSession, PositionStatus, Programme, ProgrammePosition},
    types::Uuid,
};

/// Where a position lands after one more training day. Pure, nothing is
/// persisted. Rolling past the last day of a week starts the next week, and
/// rolling past the final week completes the programme with `now` as the end
/// date
pub fn complete_day(
    position: &ProgrammePosition,
    programme: &Programme,
    now: DateTime<Utc>,
) -> Result<ProgrammePosition, ProgressionError> {
    if !position.is_active() {
        return Err(ProgressionError::PositionNotActive {
            position_id: position.id,
            status: position.status,
        });
    }

    let mut next = ProgrammePosition { last_updated_date: now, ..position.clone() };
    if position.current_day < programme.days_per_week {
        next.current_day += 1;
        return Ok(next);
    }

    next.current_week += 1;
    next.current_day = 1;
    if next.current_week > programme.duration_weeks {
        next.status = PositionStatus::Completed;
        next.end_date = Some(now);
    }

    Ok(next)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCompletion {
    pub session: CompletedSession,
    /// The position after advancing
    pub position: ProgrammePosition,
}

/// Saves the workout against the lifter's active position then moves the
/// position on by one day. Callers needing atomicity run this inside a store
/// transaction and discard it on error
#[instrument(skip(store, session))]
pub fn complete_workout<S: WorkoutStore>(
    store: &mut S,
    lifter_id: &Uuid,
    session: NewCompletedSession,
    now: DateTime<Utc>,
) -> Result<WorkoutCompletion, ProgressionError> {
    let position = active_position(store, lifter_id)?;
    let programme = programme_for(store, &position)?;

    // Work out the new position before writing anything
    let next = complete_day(&position, &programme, now)?;

    let session =
        store.save_completed_session(&position, session, now).map_err(ProgressionError::store)?;
    store
        .update_position(
            &next.id,
            next.current_week,
            next.current_day,
            next.status,
            next.end_date,
            now,
        )
        .map_err(ProgressionError::store)?;

    info!(
        position_id = %next.id,
        week = next.current_week,
        day = next.current_day,
        status = %next.status,
        "Completed workout"
    );

    Ok(WorkoutCompletion { session, position: next })
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::{
        model::{ExerciseEntry, SetEntry},
        progression::memory_store::MemoryStore,
    };

    fn at(programme: &Programme, week: u32, day: u32) -> ProgrammePosition {
        ProgrammePosition {
            current_week: week,
            current_day: day,
            ..ProgrammePosition::enroll(Uuid::new_v4(), programme.id)
        }
    }

    #[test]
    fn test_mid_week_moves_to_next_day() {
        let programme = Programme::new("Hypertrophy", 4, 8);
        let next = complete_day(&at(&programme, 2, 1), &programme, Utc::now()).unwrap();
        assert_eq!((next.current_week, next.current_day), (2, 2));
        assert_eq!(next.status, PositionStatus::Active);
        assert_eq!(next.end_date, None);
    }

    #[test]
    fn test_last_day_rolls_into_next_week() {
        let programme = Programme::new("Hypertrophy", 4, 8);
        let next = complete_day(&at(&programme, 3, 4), &programme, Utc::now()).unwrap();
        assert_eq!((next.current_week, next.current_day), (4, 1));
        assert_eq!(next.status, PositionStatus::Active);
    }

    #[test]
    fn test_last_day_of_last_week_completes() {
        let programme = Programme::new("Hypertrophy", 4, 8);
        let now = Utc::now();
        let next = complete_day(&at(&programme, 8, 4), &programme, now).unwrap();
        assert_eq!((next.current_week, next.current_day), (9, 1));
        assert_eq!(next.status, PositionStatus::Completed);
        assert_eq!(next.end_date, Some(now));
    }

    #[test]
    fn test_single_day_single_week_programme() {
        let programme = Programme::new("Test day", 1, 1);
        let next = complete_day(&at(&programme, 1, 1), &programme, Utc::now()).unwrap();
        assert_eq!(next.status, PositionStatus::Completed);
    }

    #[test]
    fn test_inactive_position_is_rejected() {
        let programme = Programme::new("Hypertrophy", 4, 8);
        let position = ProgrammePosition {
            status: PositionStatus::Completed,
            ..at(&programme, 9, 1)
        };
        assert_eq!(
            complete_day(&position, &programme, Utc::now()),
            Err(ProgressionError::PositionNotActive {
                position_id: position.id,
                status: PositionStatus::Completed,
            })
        );
    }

    fn workout() -> NewCompletedSession {
        NewCompletedSession {
            exercises: vec![ExerciseEntry {
                exercise_id: Uuid::new_v4(),
                sets: vec![SetEntry::done(100.0, 10, 10), SetEntry::done(100.0, 9, 10)],
            }],
            duration_minutes: Some(55),
            notes: Some("Felt strong".to_owned()),
        }
    }

    #[test]
    fn test_complete_workout_saves_then_advances() {
        let mut store = MemoryStore::default();
        let (lifter_id, position) = store.enroll(2, 4);

        let first = complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap();
        assert_eq!((first.session.week, first.session.day), (1, 1));
        assert_eq!(first.session.position_id, position.id);
        assert_eq!((first.position.current_week, first.position.current_day), (1, 2));

        let second = complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap();
        assert_eq!((second.session.week, second.session.day), (1, 2));
        assert_eq!((second.position.current_week, second.position.current_day), (2, 1));

        let stored = store.position(&position.id).unwrap();
        assert_eq!(stored.current_week, 2);
        assert_eq!(stored.current_day, 1);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_complete_workout_finishes_programme() {
        let mut store = MemoryStore::default();
        let (lifter_id, position) = store.enroll(1, 2);

        complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap();
        let last = complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap();
        assert_eq!(last.position.status, PositionStatus::Completed);
        assert!(last.position.end_date.is_some());

        // Nothing left to log against
        assert_eq!(
            complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap_err(),
            ProgressionError::NoActiveProgramme { lifter_id }
        );
        assert_eq!(store.position(&position.id).unwrap().status, PositionStatus::Completed);
    }

    #[test]
    fn test_complete_workout_is_stamped_with_completion_time() {
        let mut store = MemoryStore::default();
        let (lifter_id, position) = store.enroll(1, 1);
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let completion = complete_workout(&mut store, &lifter_id, workout(), now).unwrap();
        assert_eq!(completion.session.completed_date, now);
        assert_eq!(completion.position.end_date, Some(now));

        let stored = store.position(&position.id).unwrap();
        assert_eq!(stored.last_updated_date, now);
        assert_eq!(stored.end_date, Some(now));
    }

    #[test]
    fn test_failed_position_update_is_reported() {
        let mut store = MemoryStore::default();
        let (lifter_id, position) = store.enroll(3, 4);
        store.fail_position_updates();

        let err = complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap_err();
        assert!(matches!(err, ProgressionError::Store { .. }));
        assert_eq!(store.position(&position.id).unwrap().current_day, 1);
    }

    #[test]
    fn test_complete_workout_without_programme() {
        let mut store = MemoryStore::default();
        let lifter_id = Uuid::new_v4();
        assert_eq!(
            complete_workout(&mut store, &lifter_id, workout(), Utc::now()).unwrap_err(),
            ProgressionError::NoActiveProgramme { lifter_id }
        );
        assert_eq!(store.session_count(), 0);
    }
}
