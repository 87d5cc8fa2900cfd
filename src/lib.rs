pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use config::Config;

// Re-export the types most callers need
pub use common::{ApplicationError, ApplicationResult, DomainError, DomainResult, TransportError};
pub use domains::logger::{DomainLogger, DynLogger};
pub use domains::mission::{
    CommandSequencer, Health, HaltReason, OutboundMessage, RoverStatus, SequenceReport,
};
pub use domains::rover::{Command, CommandKind, Obstacle, ObstacleField, Orientation, Position, RoverState, World};
