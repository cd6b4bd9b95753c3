use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use super::{active_position, ProgressionError, WorkoutStore};
use crate::{
    model::{CompletedSession, ProgrammePosition, SetEntry},
    types::Uuid,
};

/// One session's representative performance for one exercise. Sessions
/// without any completed sets for the exercise are kept as all-zero
/// placeholders so the engine can still see the session happened
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub week: u32,
    pub day: u32,
    pub completed_date: DateTime<Utc>,
    pub load: f64,
    pub actual_reps: u32,
    pub target_reps: u32,
    pub effort: Option<f64>,
}

impl PerformancePoint {
    pub fn is_placeholder(&self) -> bool {
        self.load == 0.0 && self.actual_reps == 0 && self.target_reps == 0
    }
}

/// The completed set with the highest load × reps. Ties go to the earliest
/// set
pub fn best_set<'a, I>(sets: I) -> Option<&'a SetEntry>
where
    I: IntoIterator<Item = &'a SetEntry>,
{
    sets.into_iter().filter(|s| s.done).fold(None, |best, set| match best {
        Some(b) if b.volume() >= set.volume() => Some(b),
        _ => Some(set),
    })
}

/// Reduces a session to its best set for `exercise_id`
pub fn performance_point(session: &CompletedSession, exercise_id: &Uuid) -> PerformancePoint {
    let placeholder = PerformancePoint {
        week: session.week,
        day: session.day,
        completed_date: session.completed_date,
        ..Default::default()
    };

    match best_set(session.sets_for(exercise_id)) {
        Some(set) => PerformancePoint {
            load: set.load,
            actual_reps: set.actual_reps,
            target_reps: set.target_reps,
            effort: set.effort,
            ..placeholder
        },
        None => placeholder,
    }
}

/// Best-set history for one exercise within a known position, oldest first
#[instrument(skip(store, position), fields(position_id = %position.id))]
pub fn read_position_history<S: WorkoutStore>(
    store: &S,
    position: &ProgrammePosition,
    exercise_id: &Uuid,
    window: usize,
) -> Result<Vec<PerformancePoint>, ProgressionError> {
    let mut sessions = store
        .get_recent_sessions(position, exercise_id, window)
        .map_err(ProgressionError::store)?;

    // Stores promise oldest first, keep the newest `window` even if one
    // hands back more
    sessions.retain(|s| s.position_id == position.id && s.contains_exercise(exercise_id));
    sessions.sort_by_key(|s| s.completed_date);
    let skip = sessions.len().saturating_sub(window);

    let history: Vec<PerformancePoint> = sessions
        .iter()
        .skip(skip)
        .map(|s| performance_point(s, exercise_id))
        .collect();
    trace!(points = history.len(), "Read performance history");

    Ok(history)
}

/// Best-set history for one exercise in the lifter's active programme,
/// oldest first. Read only
pub fn read_history<S: WorkoutStore>(
    store: &S,
    lifter_id: &Uuid,
    exercise_id: &Uuid,
    window: usize,
) -> Result<Vec<PerformancePoint>, ProgressionError> {
    let position = active_position(store, lifter_id)?;
    read_position_history(store, &position, exercise_id, window)
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;
    use crate::{
        model::{ExerciseEntry, NewCompletedSession},
        progression::memory_store::MemoryStore,
    };

    #[test]
    fn test_best_set_picks_highest_volume() {
        let sets = [
            SetEntry::done(100.0, 8, 8),
            SetEntry::done(110.0, 8, 8),
            SetEntry::done(120.0, 5, 8),
        ];
        assert_eq!(best_set(&sets), Some(&sets[1]));
    }

    #[test]
    fn test_best_set_ties_go_to_first() {
        let sets = [
            SetEntry { effort: Some(7.0), ..SetEntry::done(100.0, 10, 10) },
            SetEntry { effort: Some(9.0), ..SetEntry::done(125.0, 8, 10) },
        ];
        assert_eq!(best_set(&sets).and_then(|s| s.effort), Some(7.0));
    }

    #[test]
    fn test_best_set_ignores_sets_not_done() {
        let sets = [
            SetEntry { done: false, ..SetEntry::done(200.0, 10, 10) },
            SetEntry::done(100.0, 10, 10),
        ];
        assert_eq!(best_set(&sets), Some(&sets[1]));

        let not_done = [SetEntry { done: false, ..SetEntry::done(200.0, 10, 10) }];
        assert_eq!(best_set(&not_done), None);
    }

    #[test]
    fn test_session_without_done_sets_is_a_placeholder() {
        let exercise_id = Uuid::new_v4();
        let session = CompletedSession {
            id: Uuid::new_v4(),
            position_id: Uuid::new_v4(),
            week: 2,
            day: 3,
            completed_date: Utc::now(),
            duration_minutes: None,
            notes: None,
            exercises: vec![ExerciseEntry {
                exercise_id,
                sets: vec![SetEntry { done: false, ..SetEntry::done(80.0, 0, 8) }],
            }],
        };

        let point = performance_point(&session, &exercise_id);
        assert!(point.is_placeholder());
        assert_eq!((point.week, point.day), (2, 3));
    }

    #[test]
    fn test_history_is_oldest_first_and_windowed() {
        let exercise_id = Uuid::new_v4();
        let mut store = MemoryStore::default();
        let (lifter_id, position) = store.enroll(4, 8);

        for (i, load) in [60.0, 62.5, 65.0, 67.5].into_iter().enumerate() {
            store.push_session(
                &position,
                Utc::now() + Duration::minutes(i as i64),
                NewCompletedSession {
                    exercises: vec![ExerciseEntry {
                        exercise_id,
                        sets: vec![SetEntry::done(load, 8, 8)],
                    }],
                    ..Default::default()
                },
            );
        }

        let history = read_history(&store, &lifter_id, &exercise_id, 3).unwrap();
        let loads: Vec<f64> = history.iter().map(|p| p.load).collect();
        assert_eq!(loads, vec![62.5, 65.0, 67.5]);
    }

    #[test]
    fn test_history_skips_other_exercises_and_enrolments() {
        let squat = Uuid::new_v4();
        let bench = Uuid::new_v4();
        let mut store = MemoryStore::default();
        let (lifter_id, old_position) = store.enroll(3, 4);
        store.push_session(
            &old_position,
            Utc::now() - Duration::days(30),
            NewCompletedSession {
                exercises: vec![ExerciseEntry { exercise_id: bench, sets: vec![SetEntry::done(50.0, 8, 8)] }],
                ..Default::default()
            },
        );
        store.cancel(&old_position.id);

        let position = store.enroll_lifter(lifter_id, 3, 4);
        store.push_session(
            &position,
            Utc::now(),
            NewCompletedSession {
                exercises: vec![ExerciseEntry { exercise_id: squat, sets: vec![SetEntry::done(90.0, 5, 5)] }],
                ..Default::default()
            },
        );

        assert!(read_history(&store, &lifter_id, &bench, 5).unwrap().is_empty());
        assert_eq!(read_history(&store, &lifter_id, &squat, 5).unwrap().len(), 1);
    }

    #[test]
    fn test_no_active_programme() {
        let store = MemoryStore::default();
        let lifter_id = Uuid::new_v4();
        assert_eq!(
            read_history(&store, &lifter_id, &Uuid::new_v4(), 5),
            Err(ProgressionError::NoActiveProgramme { lifter_id })
        );
    }
}
