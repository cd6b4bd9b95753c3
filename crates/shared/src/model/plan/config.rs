#[cfg(feature = "backend")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use serde::{Deserialize, Serialize};

/// Tunable constants for the progression rules. A programme may carry its own
/// copy in its config column, otherwise the reference values from
/// [`ProgressionPolicy::default`] apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionPolicy {
    /// Reps at or above this trigger a load increase
    pub rep_ceiling: u32,
    /// Reps below this are treated as a failed session
    pub failure_floor: u32,
    /// Fractional load increase, 0.05 is +5%
    pub load_increase: f64,
    /// Fractional load decrease, 0.10 is -10%
    pub load_decrease: f64,
    /// Load ratio between the last two sessions above which the lifter is
    /// assumed to have picked the weight themselves
    pub manual_jump_ratio: f64,
    /// Actual / target reps ratio above which a session counts as
    /// overperforming
    pub overperformance_ratio: f64,
    /// Fractional cut to target reps after sustained underperformance
    pub underperformance_rep_cut: f64,
    pub default_reps: u32,
    pub default_load: f64,
    /// Recommended loads are rounded to the nearest multiple of this
    pub load_rounding: f64,
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            rep_ceiling: 15,
            failure_floor: 5,
            load_increase: 0.05,
            load_decrease: 0.10,
            manual_jump_ratio: 1.10,
            overperformance_ratio: 1.10,
            underperformance_rep_cut: 0.10,
            default_reps: 8,
            default_load: 20.0,
            load_rounding: 0.5,
        }
    }
}

impl ProgressionPolicy {
    pub fn increased(&self, load: f64) -> f64 {
        load * (1.0 + self.load_increase)
    }

    pub fn decreased(&self, load: f64) -> f64 {
        load * (1.0 - self.load_decrease)
    }

    pub fn round_load(&self, load: f64) -> f64 {
        if self.load_rounding <= 0.0 {
            return load;
        }
        (load / self.load_rounding).round() * self.load_rounding
    }
}

#[cfg(feature = "backend")]
impl ToSql for ProgressionPolicy {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        serde_json::to_string_pretty(self)
            .map(ToSqlOutput::from)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }
}

#[cfg(feature = "backend")]
impl FromSql for ProgressionPolicy {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        <serde_json::Value as FromSql>::column_result(value)
            .and_then(|v| serde_json::from_value(v).map_err(|e| FromSqlError::Other(Box::new(e))))
    }
}
