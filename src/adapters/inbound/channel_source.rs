use super::frame::decode_command_frame;
use crate::domains::logger::DynLogger;
use crate::domains::mission::CommandSource;
use crate::domains::rover::Command;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Sequences handed over already typed, one `Vec<Command>` per message.
pub struct ChannelCommandSource {
    receiver: mpsc::Receiver<Vec<Command>>,
}

impl ChannelCommandSource {
    pub fn new(receiver: mpsc::Receiver<Vec<Command>>) -> Self {
        Self { receiver }
    }

    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<Command>>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl CommandSource for ChannelCommandSource {
    async fn receive_commands(&mut self) -> Option<Vec<Command>> {
        self.receiver.recv().await
    }
}

/// Raw JSON frames as they come off a socket. Frames that fail to decode are
/// logged and skipped; they never end the stream.
pub struct JsonFrameSource {
    receiver: mpsc::Receiver<String>,
    logger: DynLogger,
}

impl JsonFrameSource {
    pub fn new(receiver: mpsc::Receiver<String>, logger: DynLogger) -> Self {
        Self { receiver, logger }
    }
}

#[async_trait]
impl CommandSource for JsonFrameSource {
    async fn receive_commands(&mut self) -> Option<Vec<Command>> {
        while let Some(frame) = self.receiver.recv().await {
            match decode_command_frame(&frame) {
                Ok(commands) => return Some(commands),
                Err(e) => self.logger.warn(&format!("Discarding malformed command frame: {}", e)),
            }
        }
        None
    }
}
