use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::ValidateModel,
    progression::ProgressionRecommendation,
    types::Uuid,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub lifter_id: Uuid,
    pub exercise_ids: Vec<Uuid>,
    /// Number of working sets planned for each exercise. Falls back to the
    /// server default when missing
    pub set_count: Option<u32>,
}

impl ValidateModel for RecommendationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut error_messages = Vec::new();
        if self.exercise_ids.is_empty() {
            error_messages.push("At least one exercise is required".to_owned());
        }
        if self.set_count == Some(0) {
            error_messages.push("Set count must be at least 1".to_owned());
        }

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<ProgressionRecommendation>,
}
