use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProgressionPolicy;
use crate::types::Uuid;

#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

/// A programme is the multi-week periodised plan a lifter enrolls in. Global
/// for all lifters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("programme"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Programme {
    pub id: Uuid,
    pub name: String,
    pub days_per_week: u32,
    pub duration_weeks: u32,
    /// Overrides the reference progression policy for this programme
    pub config: Option<ProgressionPolicy>,
    pub creation_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
}

impl Programme {
    pub fn new<S: Into<String>>(name: S, days_per_week: u32, duration_weeks: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            days_per_week,
            duration_weeks,
            config: None,
            creation_date: now,
            last_updated_date: now,
        }
    }

    pub fn policy(&self) -> ProgressionPolicy {
        self.config.clone().unwrap_or_default()
    }
}

#[cfg(feature = "backend")]
impl Programme {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                ProgrammeIden::Id,
                ProgrammeIden::Name,
                ProgrammeIden::DaysPerWeek,
                ProgrammeIden::DurationWeeks,
                ProgrammeIden::Config,
                ProgrammeIden::CreationDate,
                ProgrammeIden::LastUpdatedDate,
            ])
            .from(ProgrammeIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Option<Programme>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ProgrammeIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Programme::from_row).optional()?;
        Ok(res)
    }

    pub fn create(conn: &mut Connection, programme: Programme) -> Result<Programme, rusqlite::Error> {
        let tx = conn.transaction()?;
        programme.insert(&tx)?;
        tx.commit()?;

        Ok(programme)
    }
}
