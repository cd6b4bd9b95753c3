mod rpe_schedule;
pub use rpe_schedule::*;

mod recommendations;
pub use recommendations::*;

mod complete;
pub use complete::*;
