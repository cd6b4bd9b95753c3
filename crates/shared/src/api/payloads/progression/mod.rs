mod recommendations;
pub use recommendations::*;

mod complete;
pub use complete::*;
