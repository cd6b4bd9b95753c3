use const_format::concatcp;

use crate::api::API_BASE_PATH;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    RpeSchedule,
    Recommendations,
    CompleteWorkout,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Ping => concatcp!(API_BASE_PATH, "ping"),
            RpeSchedule => concatcp!(API_BASE_PATH, "progression/rpe_schedule/:weeks"),
            Recommendations => concatcp!(API_BASE_PATH, "progression/recommendations"),
            CompleteWorkout => concatcp!(API_BASE_PATH, "progression/complete"),
        }
    }
}
