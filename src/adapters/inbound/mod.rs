pub mod channel_source;
pub mod frame;
#[cfg(feature = "kafka")]
pub mod kafka_source;

pub use channel_source::*;
pub use frame::*;
#[cfg(feature = "kafka")]
pub use kafka_source::*;
