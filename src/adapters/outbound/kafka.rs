use crate::common::TransportError;
use crate::config::KafkaConfig;
use crate::domains::logger::DynLogger;
use crate::domains::mission::{MissionTransport, OutboundMessage};
use crate::domains::rover::{Command, StatusReporter};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;

/// Publishes acknowledgements and operator messages as JSON records.
pub struct KafkaTransport {
    producer: FutureProducer,
    config: KafkaConfig,
    logger: DynLogger,
}

impl KafkaTransport {
    pub fn new(config: KafkaConfig, logger: DynLogger) -> Result<Self, TransportError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| TransportError::Broker(format!("Failed to create Kafka producer: {}", e)))?;

        Ok(Self {
            producer,
            config,
            logger,
        })
    }

    fn topic_for(&self, message: &OutboundMessage) -> &str {
        match message {
            OutboundMessage::Ack { .. } => &self.config.topics.acknowledgements,
            OutboundMessage::Report(_) | OutboundMessage::Notice { .. } => &self.config.topics.reports,
            OutboundMessage::Status(_) => &self.config.topics.status,
        }
    }

    async fn publish(&self, key: &str, message: &OutboundMessage) -> Result<(), TransportError> {
        let topic = self.topic_for(message);
        let payload = serde_json::to_string(message)?;
        let record = FutureRecord::to(topic).key(key).payload(&payload);

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(e, _)| TransportError::Broker(format!("Failed to publish to {}: {}", topic, e)))?;
        Ok(())
    }
}

#[async_trait]
impl MissionTransport for KafkaTransport {
    async fn relay(&self, command: &Command) -> Result<(), TransportError> {
        let ack = OutboundMessage::Ack {
            command: command.clone(),
        };
        self.publish(&command.id, &ack).await
    }

    async fn emit(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        self.publish(&self.config.client_id, message).await
    }
}

#[async_trait]
impl StatusReporter for KafkaTransport {
    async fn notify(&self, message: &str) {
        let notice = OutboundMessage::Notice {
            message: message.to_string(),
        };
        if let Err(e) = self.emit(&notice).await {
            self.logger.warn(&format!("Dropped status notice: {}", e));
        }
    }
}
