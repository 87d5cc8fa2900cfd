pub mod buffered_logger;
pub mod channel_transport;
pub mod console_logger;
pub mod file_logger;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod multi_logger;
pub mod noop_logger;

pub use buffered_logger::*;
pub use channel_transport::*;
pub use console_logger::*;
pub use file_logger::*;
#[cfg(feature = "kafka")]
pub use kafka::*;
pub use multi_logger::*;
pub use noop_logger::*;
