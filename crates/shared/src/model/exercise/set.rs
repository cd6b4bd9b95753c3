use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::ValidateModel,
    types::Uuid,
};

#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{Expr, Iden, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

/// One logged set. `target_reps` is what was prescribed when the set was
/// saved so later sessions can compare against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub load: f64,
    pub actual_reps: u32,
    pub target_reps: u32,
    /// Observed RPE
    pub effort: Option<f64>,
    /// A set can be logged without being completed
    pub done: bool,
}

impl SetEntry {
    pub fn done(load: f64, actual_reps: u32, target_reps: u32) -> Self {
        Self { load, actual_reps, target_reps, effort: None, done: true }
    }

    /// load × reps, used to pick a session's best set
    pub fn volume(&self) -> f64 {
        self.load * self.actual_reps as f64
    }
}

impl ValidateModel for SetEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut error_messages = Vec::new();
        if !self.load.is_finite() || self.load < 0.0 {
            error_messages.push(format!("Load must be a non-negative number, got {}", self.load));
        }
        if let Some(effort) = self.effort {
            if !(1.0..=10.0).contains(&effort) {
                error_messages.push(format!("Effort must be between 1 and 10, got {effort}"));
            }
        }

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }
}

#[cfg(feature = "backend")]
#[derive(Iden)]
pub enum SetEntryIden {
    #[iden = "set_entry"]
    Table,
    Id,
    SessionExerciseId,
    SetOrder,
    Load,
    ActualReps,
    TargetReps,
    Effort,
    Done,
}

#[cfg(feature = "backend")]
#[derive(Debug, Clone, PartialEq, Model)]
#[table("set_entry")]
pub struct SetEntryRow {
    pub id: Uuid,
    pub session_exercise_id: Uuid,
    pub set_order: u32,
    pub load: f64,
    pub actual_reps: u32,
    pub target_reps: u32,
    pub effort: Option<f64>,
    pub done: bool,
}

#[cfg(feature = "backend")]
impl SetEntryRow {
    pub fn new(session_exercise_id: Uuid, set_order: u32, set: &SetEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_exercise_id,
            set_order,
            load: set.load,
            actual_reps: set.actual_reps,
            target_reps: set.target_reps,
            effort: set.effort,
            done: set.done,
        }
    }

    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                SetEntryIden::Id,
                SetEntryIden::SessionExerciseId,
                SetEntryIden::SetOrder,
                SetEntryIden::Load,
                SetEntryIden::ActualReps,
                SetEntryIden::TargetReps,
                SetEntryIden::Effort,
                SetEntryIden::Done,
            ])
            .from(SetEntryIden::Table)
            .to_owned()
    }

    pub fn fetch_by_session_exercise_id(
        conn: &Connection,
        session_exercise_id: &Uuid,
    ) -> Result<Vec<SetEntryRow>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(SetEntryIden::SessionExerciseId).eq(session_exercise_id))
            .order_by(SetEntryIden::SetOrder, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), SetEntryRow::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }
}

#[cfg(feature = "backend")]
impl From<SetEntryRow> for SetEntry {
    fn from(row: SetEntryRow) -> Self {
        Self {
            load: row.load,
            actual_reps: row.actual_reps,
            target_reps: row.target_reps,
            effort: row.effort,
            done: row.done,
        }
    }
}

#[cfg(test)]
mod test {
    use super::SetEntry;
    use crate::model::ValidateModel;

    #[test]
    fn test_negative_load_is_invalid() {
        let set = SetEntry::done(-5.0, 8, 8);
        let err = set.validate().unwrap_err();
        assert_eq!(err.error_messages.len(), 1);
    }

    #[test]
    fn test_effort_out_of_range_is_invalid() {
        let set = SetEntry { effort: Some(11.0), ..SetEntry::done(60.0, 8, 8) };
        assert!(set.validate().is_err());

        let set = SetEntry { effort: Some(8.5), ..SetEntry::done(60.0, 8, 8) };
        assert!(set.validate().is_ok());
    }
}
