pub mod bootstrap;
pub mod mission_actor;
pub mod mission_orchestrator;

pub use bootstrap::*;
pub use mission_actor::*;
pub use mission_orchestrator::*;
