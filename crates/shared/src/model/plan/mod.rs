mod config;
pub use config::*;

mod programme;
pub use programme::*;

mod position;
pub use position::*;
