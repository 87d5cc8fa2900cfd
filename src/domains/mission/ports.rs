use super::projections::OutboundMessage;
use crate::common::TransportError;
use crate::domains::rover::Command;
use async_trait::async_trait;
use std::sync::Arc;

/// Inbound side of the transport: yields already-parsed command sequences.
/// `None` means the transport has closed and no more sequences will arrive.
#[async_trait]
pub trait CommandSource: Send {
    async fn receive_commands(&mut self) -> Option<Vec<Command>>;
}

/// Outbound side of the transport.
#[async_trait]
pub trait MissionTransport: Send + Sync {
    /// Forwards an executed command for acknowledgement by the remote end.
    async fn relay(&self, command: &Command) -> Result<(), TransportError>;

    /// Sends a report, notice or status snapshot to the operator.
    async fn emit(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

pub type DynTransport = Arc<dyn MissionTransport>;
