use crate::domains::logger::DynLogger;
use crate::domains::mission::{
    CommandOutcome, CommandSequencer, DynTransport, HaltReason, OutboundMessage, RoverStatus,
    SequenceReport, SequenceResult,
};
use crate::domains::rover::{Command, Obstacle};
use tokio::sync::watch;

/// Boundary-facing coordinator. Owns the sequencer (and through it the rover),
/// turns every run into an operator report and keeps the transport informed.
/// Transport failures are logged and swallowed: local state is authoritative.
pub struct MissionOrchestrator {
    sequencer: CommandSequencer,
    transport: DynTransport,
    logger: DynLogger,
}

impl MissionOrchestrator {
    pub fn new(sequencer: CommandSequencer, transport: DynTransport, logger: DynLogger) -> Self {
        Self {
            sequencer,
            transport,
            logger,
        }
    }

    pub async fn submit(&mut self, commands: Vec<Command>) -> SequenceReport {
        if commands.len() > 1 {
            self.logger
                .info(&format!("Executing {} commands sequentially", commands.len()));
        }

        let result = self.sequencer.run(&commands).await;
        let report = summarize(&result);

        self.relay_attempted(&commands, &result).await;

        match report.halt_reason {
            HaltReason::None => self.logger.info(&report.message),
            _ => self.logger.warn(&report.message),
        }

        self.emit(OutboundMessage::Report(report.clone())).await;
        self.emit(OutboundMessage::Status(self.status())).await;

        report
    }

    pub fn status(&self) -> RoverStatus {
        self.sequencer.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<RoverStatus> {
        self.sequencer.subscribe()
    }

    /// Obstacles revealed so far; hidden ones never leave the field.
    pub fn discovered_obstacles(&self) -> Vec<Obstacle> {
        self.sequencer.field().scan()
    }

    /// Every command that was actually attempted goes out for acknowledgement,
    /// including the one that halted the sequence. Skipped tokens do not.
    async fn relay_attempted(&self, commands: &[Command], result: &SequenceResult) {
        // Records line up with commands by index; ids are opaque and may repeat.
        let attempted = commands
            .iter()
            .zip(&result.records)
            .filter(|(_, record)| !matches!(record.outcome, CommandOutcome::Skipped { .. }))
            .map(|(command, _)| command);

        for command in attempted {
            if let Err(e) = self.transport.relay(command).await {
                self.logger.error(&format!(
                    "Failed to relay command {} ({}): {}",
                    command.id, command.kind, e
                ));
            }
        }
    }

    async fn emit(&self, message: OutboundMessage) {
        if let Err(e) = self.transport.emit(&message).await {
            self.logger
                .error(&format!("Failed to emit message to transport: {}", e));
        }
    }
}

/// Builds the operator-facing summary of a run.
pub fn summarize(result: &SequenceResult) -> SequenceReport {
    let (completed, total) = (result.completed, result.total);

    let mut message = match result.halt_reason {
        HaltReason::BatteryEmpty => format!(
            "BATTERY EMPTY! Completed {}/{} commands. Send a charge command to recharge.",
            completed, total
        ),
        HaltReason::ObstacleEncountered => format!(
            "OBSTACLE DETECTED! Completed {}/{} commands before encountering obstacle.",
            completed, total
        ),
        HaltReason::None => format!(
            "All commands executed: {}/{} completed successfully.",
            completed, total
        ),
    };

    let skipped = result.skipped();
    if skipped > 0 {
        message.push_str(&format!(" Skipped {} unrecognized command(s).", skipped));
    }

    SequenceReport {
        completed,
        total,
        halt_reason: result.halt_reason,
        message,
    }
}
