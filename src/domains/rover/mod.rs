pub mod aggregate;
pub mod charge;
pub mod commands;
pub mod events;
pub mod obstacles;
pub mod ports;
pub mod types;

pub use aggregate::*;
pub use charge::*;
pub use commands::*;
pub use events::*;
pub use obstacles::*;
pub use ports::*;
pub use types::*;
