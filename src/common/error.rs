use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Invalid world: {reason}")]
    InvalidWorld { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failures of the transport collaborator. Local rover state is authoritative,
/// so these are logged by the orchestrator and never roll anything back.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Transport channel closed")]
    ChannelClosed,

    #[error("Transport channel full")]
    ChannelFull,

    #[error("Failed to encode transport message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Broker error: {0}")]
    Broker(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Mission queue closed")]
    QueueClosed,

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
