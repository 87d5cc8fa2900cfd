use crate::common::TransportError;
use crate::domains::logger::DynLogger;
use crate::domains::mission::{MissionTransport, OutboundMessage};
use crate::domains::rover::{Command, StatusReporter};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// In-process transport: every outbound message lands on a bounded channel
/// drained by whoever plays the operator side (the binary, a bridge, a test).
pub struct ChannelTransport {
    sender: mpsc::Sender<OutboundMessage>,
    logger: DynLogger,
}

impl ChannelTransport {
    pub fn new(sender: mpsc::Sender<OutboundMessage>, logger: DynLogger) -> Self {
        Self { sender, logger }
    }

    /// Builds a transport together with the operator-side receiver.
    pub fn channel(capacity: usize, logger: DynLogger) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender, logger), receiver)
    }

    /// Waits for room in the channel; fails only once the operator side is gone.
    async fn deliver(&self, message: OutboundMessage) -> Result<(), TransportError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }

    /// Lossy variant for progress notices.
    fn push(&self, message: OutboundMessage) -> Result<(), TransportError> {
        self.sender.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => TransportError::ChannelClosed,
        })
    }
}

#[async_trait]
impl MissionTransport for ChannelTransport {
    async fn relay(&self, command: &Command) -> Result<(), TransportError> {
        self.deliver(OutboundMessage::Ack {
            command: command.clone(),
        })
        .await
    }

    async fn emit(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.deliver(message.clone()).await
    }
}

#[async_trait]
impl StatusReporter for ChannelTransport {
    async fn notify(&self, message: &str) {
        let notice = OutboundMessage::Notice {
            message: message.to_string(),
        };
        if let Err(e) = self.push(notice) {
            self.logger
                .warn(&format!("Dropped status notice '{}': {}", message, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::init_noop_logger;
    use crate::domains::rover::CommandKind;

    #[tokio::test]
    async fn relay_wraps_the_command_in_an_ack() {
        let (transport, mut receiver) = ChannelTransport::channel(4, init_noop_logger());
        let command = Command::new(CommandKind::Scan);

        transport.relay(&command).await.unwrap();

        match receiver.recv().await {
            Some(OutboundMessage::Ack { command: acked }) => assert_eq!(acked.id, command.id),
            other => panic!("Expected Ack, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn relay_waits_for_room_instead_of_dropping() {
        let (transport, mut receiver) = ChannelTransport::channel(1, init_noop_logger());
        let commands: Vec<Command> = (0..5).map(|_| Command::new(CommandKind::TurnLeft)).collect();

        let drain = tokio::spawn(async move {
            let mut received = 0;
            while receiver.recv().await.is_some() {
                received += 1;
            }
            received
        });

        for command in &commands {
            transport.relay(command).await.unwrap();
        }
        drop(transport);

        assert_eq!(drain.await.unwrap(), 5);
    }

    #[tokio::test]
    async fn notices_are_dropped_on_a_full_channel_and_closed_relays_fail() {
        let (transport, mut receiver) = ChannelTransport::channel(1, init_noop_logger());

        transport.notify("first").await;
        transport.notify("second").await;
        match receiver.try_recv() {
            Ok(OutboundMessage::Notice { message }) => assert_eq!(message, "first"),
            other => panic!("Expected the first notice, got {:?}", other),
        }
        assert!(receiver.try_recv().is_err());

        drop(receiver);
        assert!(matches!(
            transport.relay(&Command::new(CommandKind::Scan)).await,
            Err(TransportError::ChannelClosed)
        ));
    }
}
