mod set;
pub use set::*;

mod session_exercise;
pub use session_exercise::*;

mod session;
pub use session::*;
