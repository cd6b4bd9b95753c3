pub mod error;
mod object;
pub use object::*;
pub mod payloads;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";
