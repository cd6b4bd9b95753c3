mod exercise;
pub use exercise::*;

mod plan;
pub use plan::*;

use crate::api::error::ValidationError;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}
