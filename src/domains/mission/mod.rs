pub mod ports;
pub mod projections;
pub mod sequencer;

pub use ports::*;
pub use projections::*;
pub use sequencer::*;
