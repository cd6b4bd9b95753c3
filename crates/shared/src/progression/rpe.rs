use serde::{Deserialize, Serialize};

use super::ProgressionError;

pub const OPENING_RPE: u8 = 7;
pub const PEAK_RPE: u8 = 10;
pub const DELOAD_RPE: u8 = 5;

/// Target RPE for each week of a programme. Never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>")]
pub struct RpeSchedule(Vec<u8>);

impl RpeSchedule {
    /// Target for a 0-based week index. Weeks past the end of the table reuse
    /// the final value
    pub fn target_for_week(&self, week_index: usize) -> u8 {
        self.0[week_index.min(self.0.len() - 1)]
    }

    pub fn weeks(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for RpeSchedule {
    type Error = ProgressionError;

    fn try_from(weeks: Vec<u8>) -> Result<Self, Self::Error> {
        if weeks.is_empty() {
            return Err(ProgressionError::InvalidProgramLength { weeks: 0 });
        }
        Ok(Self(weeks))
    }
}

impl From<RpeSchedule> for Vec<u8> {
    fn from(schedule: RpeSchedule) -> Self {
        schedule.0
    }
}

/// Builds the per-week RPE targets: week 1 opens at 7, the second to last
/// week peaks at 10 and the final week deloads at 5. Weeks in between climb
/// linearly from 7 to 10, rounded down
pub fn rpe_schedule(program_length: u32) -> Result<RpeSchedule, ProgressionError> {
    let weeks = match program_length {
        0 => return Err(ProgressionError::InvalidProgramLength { weeks: program_length }),
        1 => vec![OPENING_RPE],
        2 => vec![OPENING_RPE, DELOAD_RPE],
        n => {
            // Week 1 is the opening anchor and week n-1 the peak
            let span = n - 2;
            let rise = u32::from(PEAK_RPE - OPENING_RPE);
            let mut weeks: Vec<u8> = (0..n - 1)
                .map(|i| OPENING_RPE + (rise * i / span) as u8)
                .collect();
            weeks.push(DELOAD_RPE);
            weeks
        }
    };

    Ok(RpeSchedule(weeks))
}
