use serde::{Deserialize, Serialize};

use super::SetEntry;
use crate::{api::error::ValidationError, model::ValidateModel, types::Uuid};

#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

/// The ordered sets logged for one exercise within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub exercise_id: Uuid,
    pub sets: Vec<SetEntry>,
}

impl ValidateModel for ExerciseEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        let error_messages: Vec<String> = self
            .sets
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.validate().err().map(|e| (i, e)))
            .flat_map(|(i, e)| {
                e.error_messages
                    .into_iter()
                    .map(move |m| format!("Exercise {} set {}: {m}", self.exercise_id, i + 1))
            })
            .collect();

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }
}

#[cfg(feature = "backend")]
#[derive(Iden)]
pub enum SessionExerciseIden {
    #[iden = "session_exercise"]
    Table,
    Id,
    SessionId,
    ExerciseId,
    ExerciseOrder,
}

#[cfg(feature = "backend")]
#[derive(Debug, Clone, PartialEq, Model)]
#[table("session_exercise")]
pub struct SessionExerciseRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_order: u32,
}

#[cfg(feature = "backend")]
impl SessionExerciseRow {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                SessionExerciseIden::Id,
                SessionExerciseIden::SessionId,
                SessionExerciseIden::ExerciseId,
                SessionExerciseIden::ExerciseOrder,
            ])
            .from(SessionExerciseIden::Table)
            .to_owned()
    }

    /// Fetches the exercises of a session in logged order, optionally only the
    /// ones for a single exercise
    pub fn fetch_by_session_id(
        conn: &Connection,
        session_id: &Uuid,
        exercise_id: Option<&Uuid>,
    ) -> Result<Vec<SessionExerciseRow>, rusqlite::Error> {
        let mut query = Self::select_star();
        query.and_where(Expr::col(SessionExerciseIden::SessionId).eq(session_id));
        if let Some(exercise_id) = exercise_id {
            query.and_where(Expr::col(SessionExerciseIden::ExerciseId).eq(exercise_id));
        }
        let (sql, values) = query
            .order_by(SessionExerciseIden::ExerciseOrder, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), SessionExerciseRow::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }
}
