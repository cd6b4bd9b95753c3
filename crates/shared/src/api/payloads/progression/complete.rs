use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{ExerciseEntry, ProgrammePosition, ValidateModel},
    types::Uuid,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteWorkoutRequest {
    pub lifter_id: Uuid,
    pub exercises: Vec<ExerciseEntry>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
}

impl ValidateModel for CompleteWorkoutRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let error_messages: Vec<String> = self
            .exercises
            .iter()
            .filter_map(|e| e.validate().err())
            .flat_map(|e| e.error_messages)
            .collect();

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteWorkoutResponse {
    pub session_id: Uuid,
    /// The position after advancing, `COMPLETED` once the last day of the
    /// programme has been logged
    pub position: ProgrammePosition,
}
