pub mod logger;
pub mod mission;
pub mod rover;

pub use logger::{DomainLogger, DynLogger, FileLogger};
