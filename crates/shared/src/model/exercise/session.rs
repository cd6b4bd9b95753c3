use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ExerciseEntry;
use crate::types::Uuid;

#[cfg(feature = "backend")]
use {
    super::{SessionExerciseIden, SessionExerciseRow, SetEntryRow},
    crate::model::ProgrammePosition,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

/// Immutable record of one finished workout. Stamped with the week and day
/// of the programme position it was logged against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub id: Uuid,
    pub position_id: Uuid,
    pub week: u32,
    pub day: u32,
    pub completed_date: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseEntry>,
}

/// A workout as submitted by the lifter, before it is stamped with a
/// position and persisted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewCompletedSession {
    pub exercises: Vec<ExerciseEntry>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
}

impl CompletedSession {
    /// All sets logged for `exercise_id` in this session, in logged order
    pub fn sets_for<'a>(
        &'a self,
        exercise_id: &'a Uuid,
    ) -> impl Iterator<Item = &'a super::SetEntry> + 'a {
        self.exercises
            .iter()
            .filter(move |e| &e.exercise_id == exercise_id)
            .flat_map(|e| e.sets.iter())
    }

    pub fn contains_exercise(&self, exercise_id: &Uuid) -> bool {
        self.exercises.iter().any(|e| &e.exercise_id == exercise_id)
    }
}

#[cfg(feature = "backend")]
#[derive(Iden)]
pub enum CompletedSessionIden {
    #[iden = "completed_session"]
    Table,
    Id,
    PositionId,
    Week,
    Day,
    CompletedDate,
    DurationMinutes,
    Notes,
}

#[cfg(feature = "backend")]
#[derive(Debug, Clone, PartialEq, Model)]
#[table("completed_session")]
pub struct CompletedSessionRow {
    pub id: Uuid,
    pub position_id: Uuid,
    pub week: u32,
    pub day: u32,
    pub completed_date: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
}

#[cfg(feature = "backend")]
impl CompletedSessionRow {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                (CompletedSessionIden::Table, CompletedSessionIden::Id),
                (CompletedSessionIden::Table, CompletedSessionIden::PositionId),
                (CompletedSessionIden::Table, CompletedSessionIden::Week),
                (CompletedSessionIden::Table, CompletedSessionIden::Day),
                (CompletedSessionIden::Table, CompletedSessionIden::CompletedDate),
                (CompletedSessionIden::Table, CompletedSessionIden::DurationMinutes),
                (CompletedSessionIden::Table, CompletedSessionIden::Notes),
            ])
            .from(CompletedSessionIden::Table)
            .to_owned()
    }

    fn into_session(self, exercises: Vec<ExerciseEntry>) -> CompletedSession {
        CompletedSession {
            id: self.id,
            position_id: self.position_id,
            week: self.week,
            day: self.day,
            completed_date: self.completed_date,
            duration_minutes: self.duration_minutes,
            notes: self.notes,
            exercises,
        }
    }
}

#[cfg(feature = "backend")]
fn fetch_exercises(
    conn: &Connection,
    session_id: &Uuid,
    exercise_id: Option<&Uuid>,
) -> Result<Vec<ExerciseEntry>, rusqlite::Error> {
    SessionExerciseRow::fetch_by_session_id(conn, session_id, exercise_id)?
        .into_iter()
        .map(|se| {
            let sets = SetEntryRow::fetch_by_session_exercise_id(conn, &se.id)?
                .into_iter()
                .map(Into::into)
                .collect();
            Ok(ExerciseEntry { exercise_id: se.exercise_id, sets })
        })
        .collect()
}

#[cfg(feature = "backend")]
impl CompletedSession {
    pub fn fetch_by_id(
        conn: &Connection,
        id: &Uuid,
    ) -> Result<Option<CompletedSession>, rusqlite::Error> {
        let (sql, values) = CompletedSessionRow::select_star()
            .and_where(Expr::col((CompletedSessionIden::Table, CompletedSessionIden::Id)).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let Some(row) =
            stmt.query_row(&*values.as_params(), CompletedSessionRow::from_row).optional()?
        else {
            return Ok(None);
        };

        let exercises = fetch_exercises(conn, &row.id, None)?;
        Ok(Some(row.into_session(exercises)))
    }

    /// Returns up to `limit` of the most recent sessions logged against
    /// `position_id` that include `exercise_id`, oldest first. Only the
    /// entries for that exercise are loaded
    pub fn fetch_recent_with_exercise(
        conn: &Connection,
        position_id: &Uuid,
        exercise_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<CompletedSession>, rusqlite::Error> {
        let (sql, values) = CompletedSessionRow::select_star()
            .and_where(
                Expr::col((CompletedSessionIden::Table, CompletedSessionIden::PositionId))
                    .eq(position_id),
            )
            .and_where(
                Expr::col((CompletedSessionIden::Table, CompletedSessionIden::Id)).in_subquery(
                    Query::select()
                        .column(SessionExerciseIden::SessionId)
                        .from(SessionExerciseIden::Table)
                        .and_where(Expr::col(SessionExerciseIden::ExerciseId).eq(exercise_id))
                        .to_owned(),
                ),
            )
            .order_by(
                (CompletedSessionIden::Table, CompletedSessionIden::CompletedDate),
                Order::Desc,
            )
            .order_by_expr(Expr::cust("completed_session.rowid"), Order::Desc)
            .limit(limit as u64)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let rows: Vec<CompletedSessionRow> = stmt
            .query_map(&*values.as_params(), CompletedSessionRow::from_row)?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .rev()
            .map(|row| {
                let exercises = fetch_exercises(conn, &row.id, Some(exercise_id))?;
                Ok(row.into_session(exercises))
            })
            .collect()
    }

    /// Inserts the session, its exercises and their sets. Does not open a
    /// transaction, callers wrap this together with the position update
    pub fn create(
        conn: &Connection,
        position: &ProgrammePosition,
        new_session: NewCompletedSession,
        completed_date: DateTime<Utc>,
    ) -> Result<CompletedSession, rusqlite::Error> {
        let NewCompletedSession { exercises, duration_minutes, notes } = new_session;
        let row = CompletedSessionRow {
            id: Uuid::new_v4(),
            position_id: position.id,
            week: position.current_week,
            day: position.current_day,
            completed_date,
            duration_minutes,
            notes,
        };
        row.insert(conn)?;

        for (exercise_order, entry) in exercises.iter().enumerate() {
            let session_exercise = SessionExerciseRow {
                id: Uuid::new_v4(),
                session_id: row.id,
                exercise_id: entry.exercise_id,
                exercise_order: exercise_order as u32,
            };
            session_exercise.insert(conn)?;

            for (set_order, set) in entry.sets.iter().enumerate() {
                SetEntryRow::new(session_exercise.id, set_order as u32, set).insert(conn)?;
            }
        }

        Ok(row.into_session(exercises))
    }
}
