mod progression;
pub use progression::*;
