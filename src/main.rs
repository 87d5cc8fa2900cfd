use anyhow::Result;
use rover_mission::adapters::inbound::JsonFrameSource;
use rover_mission::adapters::outbound::{
    init_buffered_logger, init_combined_logger, init_tracing, ChannelTransport,
};
use rover_mission::application::{build_sequencer, pump_commands, MissionActor, MissionOrchestrator};
use rover_mission::domains::mission::OutboundMessage;
use rover_mission::domains::rover::TokioClock;
use rover_mission::Config;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    info!("Starting rover mission");

    let path = Path::new("config.toml");
    let config = Config::load(path.exists().then_some(path))?;
    info!(
        "Configuration loaded: {}x{} grid, {} seed obstacles",
        config.world.size,
        config.world.size,
        config.world.obstacles.len()
    );

    let logger = init_buffered_logger(
        init_combined_logger(config.logging.file.as_deref(), config.log_level()),
        config.logging.buffer_capacity,
    );

    #[cfg(feature = "kafka")]
    {
        if config.kafka.enabled {
            return run_with_kafka(config, logger).await;
        }
    }

    let (transport, mut outbound) = ChannelTransport::channel(config.mission.queue_capacity * 8, logger.clone());
    let transport = Arc::new(transport);

    let sequencer = build_sequencer(&config, Arc::new(TokioClock), transport.clone(), logger.clone())?;
    let orchestrator = MissionOrchestrator::new(sequencer, transport, logger.clone());
    let (actor, handle) = MissionActor::new(orchestrator, config.mission.queue_capacity);
    let mission = tokio::spawn(actor.run());

    info!("Initial status: {}", handle.status());

    // Operator side of the transport: print everything the rover sends back.
    let printer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            match &message {
                OutboundMessage::Report(report) => info!("{}", report.message),
                OutboundMessage::Status(status) => info!("{}", status),
                OutboundMessage::Notice { message } => info!("{}", message),
                OutboundMessage::Ack { .. } => match serde_json::to_string(&message) {
                    Ok(json) => info!("ack {}", json),
                    Err(e) => error!("Failed to encode ack: {}", e),
                },
            }
        }
    });

    // Each stdin line is one JSON command frame.
    let (frames_tx, frames_rx) = mpsc::channel(config.mission.queue_capacity);
    let source = JsonFrameSource::new(frames_rx, logger.clone());
    let pump = tokio::spawn(pump_commands(source, handle.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if !line.trim().is_empty() => {
                    if frames_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    drop(frames_tx);
    let forwarded = pump.await??;
    drop(handle);

    let orchestrator = mission.await?;
    info!("Final status after {} sequences: {}", forwarded, orchestrator.status());
    drop(orchestrator);
    printer.await?;

    info!("Shutting down rover mission");
    Ok(())
}

/// Commands from the commands topic, acknowledgements and reports back to Kafka.
#[cfg(feature = "kafka")]
async fn run_with_kafka(config: Config, logger: rover_mission::domains::DynLogger) -> Result<()> {
    use rover_mission::adapters::inbound::KafkaCommandSource;
    use rover_mission::adapters::outbound::KafkaTransport;

    info!("Using Kafka transport at {}", config.kafka.brokers.join(","));
    let transport = Arc::new(KafkaTransport::new(config.kafka.clone(), logger.clone())?);
    let source = KafkaCommandSource::new(&config.kafka, logger.clone())?;

    let sequencer = build_sequencer(&config, Arc::new(TokioClock), transport.clone(), logger.clone())?;
    let orchestrator = MissionOrchestrator::new(sequencer, transport, logger);
    let (actor, handle) = MissionActor::new(orchestrator, config.mission.queue_capacity);
    let mission = tokio::spawn(actor.run());

    info!("Initial status: {}", handle.status());

    tokio::select! {
        pumped = pump_commands(source, handle.clone()) => {
            let forwarded = pumped?;
            info!("Command stream ended after {} sequences", forwarded);
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    drop(handle);

    let orchestrator = mission.await?;
    info!("Final status: {}", orchestrator.status());
    Ok(())
}
