use super::frame::decode_command_frame;
use crate::common::TransportError;
use crate::config::KafkaConfig;
use crate::domains::logger::DynLogger;
use crate::domains::mission::CommandSource;
use crate::domains::rover::Command;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::Message;

/// Reads command frames from the commands topic, one sequence per record.
pub struct KafkaCommandSource {
    consumer: StreamConsumer,
    logger: DynLogger,
}

impl KafkaCommandSource {
    pub fn new(config: &KafkaConfig, logger: DynLogger) -> Result<Self, TransportError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("group.id", &config.group_id)
            .set("client.id", &config.client_id)
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000")
            .set("enable.auto.commit", "true")
            .create()
            .map_err(|e| TransportError::Broker(format!("Failed to create Kafka consumer: {}", e)))?;

        consumer
            .subscribe(&[config.topics.commands.as_str()])
            .map_err(|e| TransportError::Broker(format!("Failed to subscribe: {}", e)))?;

        Ok(Self { consumer, logger })
    }
}

#[async_trait]
impl CommandSource for KafkaCommandSource {
    async fn receive_commands(&mut self) -> Option<Vec<Command>> {
        loop {
            let message = match self.consumer.recv().await {
                Ok(message) => message,
                Err(e) => {
                    self.logger.error(&format!("Kafka receive failed: {}", e));
                    continue;
                }
            };

            let decoded = match message.payload_view::<str>() {
                Some(Ok(payload)) => decode_command_frame(payload),
                Some(Err(e)) => {
                    self.logger.warn(&format!("Command record is not UTF-8: {}", e));
                    continue;
                }
                None => continue,
            };

            match decoded {
                Ok(commands) => return Some(commands),
                Err(e) => self
                    .logger
                    .warn(&format!("Discarding malformed command record: {}", e)),
            }
        }
    }
}
