use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Uuid;

#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{
        types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
        Connection, OptionalExtension, ToSql,
    },
    sea_query::{enum_def, Expr, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Active,
    Completed,
    /// Set externally, e.g. when a subscription lapses
    Cancelled,
}

impl PositionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Active => "ACTIVE",
            PositionStatus::Completed => "COMPLETED",
            PositionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown programme position status: {0:?}")]
pub struct UnknownPositionStatus(pub String);

impl FromStr for PositionStatus {
    type Err = UnknownPositionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(PositionStatus::Active),
            "COMPLETED" => Ok(PositionStatus::Completed),
            "CANCELLED" => Ok(PositionStatus::Cancelled),
            other => Err(UnknownPositionStatus(other.to_owned())),
        }
    }
}

#[cfg(feature = "backend")]
impl ToSql for PositionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(feature = "backend")]
impl FromSql for PositionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(feature = "backend")]
impl From<PositionStatus> for sea_query::Value {
    fn from(value: PositionStatus) -> Self {
        value.as_str().into()
    }
}

/// A lifter's enrollment in a programme and their (week, day) pointer into
/// it. Weeks and days are 1-based. At most one position per lifter may be
/// [`PositionStatus::Active`], the schema enforces this with a partial unique
/// index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("programme_position"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct ProgrammePosition {
    pub id: Uuid,
    pub lifter_id: Uuid,
    pub programme_id: Uuid,
    pub current_week: u32,
    pub current_day: u32,
    pub status: PositionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub last_updated_date: DateTime<Utc>,
}

impl ProgrammePosition {
    /// Enrolls a lifter at week 1, day 1
    pub fn enroll(lifter_id: Uuid, programme_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            lifter_id,
            programme_id,
            current_week: 1,
            current_day: 1,
            status: PositionStatus::Active,
            start_date: now,
            end_date: None,
            last_updated_date: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PositionStatus::Active
    }

    /// 0-based index into the programme's RPE schedule
    pub fn week_index(&self) -> usize {
        self.current_week.saturating_sub(1) as usize
    }
}

#[cfg(feature = "backend")]
impl ProgrammePosition {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                ProgrammePositionIden::Id,
                ProgrammePositionIden::LifterId,
                ProgrammePositionIden::ProgrammeId,
                ProgrammePositionIden::CurrentWeek,
                ProgrammePositionIden::CurrentDay,
                ProgrammePositionIden::Status,
                ProgrammePositionIden::StartDate,
                ProgrammePositionIden::EndDate,
                ProgrammePositionIden::LastUpdatedDate,
            ])
            .from(ProgrammePositionIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id(
        conn: &Connection,
        id: &Uuid,
    ) -> Result<Option<ProgrammePosition>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ProgrammePositionIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), ProgrammePosition::from_row).optional()?;
        Ok(res)
    }

    pub fn fetch_active_by_lifter_id(
        conn: &Connection,
        lifter_id: &Uuid,
    ) -> Result<Option<ProgrammePosition>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ProgrammePositionIden::LifterId).eq(lifter_id))
            .and_where(Expr::col(ProgrammePositionIden::Status).eq(PositionStatus::Active))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), ProgrammePosition::from_row).optional()?;
        Ok(res)
    }

    pub fn create(
        conn: &mut Connection,
        position: ProgrammePosition,
    ) -> Result<ProgrammePosition, rusqlite::Error> {
        let tx = conn.transaction()?;
        position.insert(&tx)?;
        tx.commit()?;

        Ok(position)
    }

    /// Moves the position pointer. Only rows that are still active are
    /// touched, the number of rows changed is returned so callers can detect a
    /// stale or missing position
    pub fn update_progress(
        conn: &Connection,
        id: &Uuid,
        week: u32,
        day: u32,
        status: PositionStatus,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<usize, rusqlite::Error> {
        let (sql, values) = Query::update()
            .table(ProgrammePositionIden::Table)
            .values([
                (ProgrammePositionIden::CurrentWeek, week.into()),
                (ProgrammePositionIden::CurrentDay, day.into()),
                (ProgrammePositionIden::Status, status.into()),
                (ProgrammePositionIden::EndDate, end_date.into()),
                (ProgrammePositionIden::LastUpdatedDate, now.into()),
            ])
            .and_where(Expr::col(ProgrammePositionIden::Id).eq(id))
            .and_where(Expr::col(ProgrammePositionIden::Status).eq(PositionStatus::Active))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let changed = stmt.execute(&*values.as_params())?;

        Ok(changed)
    }
}
