use super::projections::{RoverStatus, DEFAULT_CRITICAL_BATTERY};
use crate::common::AggregateRoot;
use crate::domains::logger::DynLogger;
use crate::domains::rover::{
    Command, CommandKind, DynClock, DynReporter, Obstacle, ObstacleField, Orientation, Position,
    RoverEvent, RoverSnapshot, RoverState,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;

pub const RETURN_TO_BASE_MESSAGE: &str = "Return command received. Planning route back to base.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceState {
    Running(usize),
    HaltedObstacle(usize),
    HaltedBatteryEmpty(usize),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    None,
    ObstacleEncountered,
    BatteryEmpty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Moved { position: Position },
    Blocked(Obstacle),
    Turned { orientation: Orientation },
    BatteryEmpty,
    Charged { battery: u8, checkpoints: Vec<u8> },
    ScanCompleted(Vec<Obstacle>),
    Acknowledged { message: String },
    Skipped { token: String },
}

impl CommandOutcome {
    fn from_movement(snapshot: RoverSnapshot) -> Self {
        if snapshot.battery_empty {
            CommandOutcome::BatteryEmpty
        } else if let Some(obstacle) = snapshot.obstacle {
            CommandOutcome::Blocked(obstacle)
        } else {
            CommandOutcome::Moved {
                position: snapshot.position,
            }
        }
    }

    fn from_turn(snapshot: RoverSnapshot) -> Self {
        if snapshot.battery_empty {
            CommandOutcome::BatteryEmpty
        } else {
            CommandOutcome::Turned {
                orientation: snapshot.orientation,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command_id: String,
    pub kind: CommandKind,
    pub outcome: CommandOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub completed: usize,
    pub total: usize,
    pub halt_reason: HaltReason,
    pub state: SequenceState,
    pub records: Vec<CommandRecord>,
    pub events: Vec<RoverEvent>,
}

impl SequenceResult {
    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, CommandOutcome::Skipped { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerSettings {
    /// Cosmetic pause between applied commands.
    pub command_interval: Duration,
    /// Simulated delay before each charge checkpoint.
    pub charge_step: Duration,
    /// When set, `Scan` only reveals obstacles within this radius of the rover.
    pub scan_radius: Option<i32>,
    pub critical_battery: u8,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            command_interval: Duration::from_millis(300),
            charge_step: Duration::from_millis(1000),
            scan_radius: None,
            critical_battery: DEFAULT_CRITICAL_BATTERY,
        }
    }
}

/// Sole owner of a rover and its obstacle field. All mutation goes through
/// `run`, which borrows the sequencer mutably for the whole sequence.
pub struct CommandSequencer {
    rover: RoverState,
    field: ObstacleField,
    clock: DynClock,
    reporter: DynReporter,
    logger: DynLogger,
    settings: SequencerSettings,
    last_halt: HaltReason,
    status_tx: watch::Sender<RoverStatus>,
}

impl CommandSequencer {
    pub fn new(
        mut rover: RoverState,
        field: ObstacleField,
        clock: DynClock,
        reporter: DynReporter,
        logger: DynLogger,
        settings: SequencerSettings,
    ) -> Self {
        rover.mark_events_as_committed();
        let status = RoverStatus::derive(&rover.snapshot(), HaltReason::None, settings.critical_battery);
        let (status_tx, _) = watch::channel(status);

        Self {
            rover,
            field,
            clock,
            reporter,
            logger,
            settings,
            last_halt: HaltReason::None,
            status_tx,
        }
    }

    pub fn rover(&self) -> &RoverState {
        &self.rover
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn last_halt(&self) -> HaltReason {
        self.last_halt
    }

    pub fn status(&self) -> RoverStatus {
        self.status_tx.borrow().clone()
    }

    /// Receiver of status snapshots, refreshed after every applied command.
    pub fn subscribe(&self) -> watch::Receiver<RoverStatus> {
        self.status_tx.subscribe()
    }

    pub async fn run(&mut self, commands: &[Command]) -> SequenceResult {
        let total = commands.len();
        let mut completed = 0;
        let mut halt_reason = HaltReason::None;
        let mut state = SequenceState::Running(0);
        let mut records = Vec::with_capacity(total);

        self.last_halt = HaltReason::None;

        for (index, command) in commands.iter().enumerate() {
            state = SequenceState::Running(index);
            let outcome = self.apply(command).await;

            let halted = match &outcome {
                CommandOutcome::BatteryEmpty => {
                    state = SequenceState::HaltedBatteryEmpty(index);
                    halt_reason = HaltReason::BatteryEmpty;
                    true
                }
                CommandOutcome::Blocked(obstacle) => {
                    self.logger.warn(&format!(
                        "Obstacle detected at {} while executing command {}",
                        obstacle.position, command.id
                    ));
                    state = SequenceState::HaltedObstacle(index);
                    halt_reason = HaltReason::ObstacleEncountered;
                    true
                }
                CommandOutcome::Skipped { token } => {
                    self.logger.warn(&format!(
                        "Skipping unrecognized command '{}' ({})",
                        token, command.id
                    ));
                    false
                }
                _ => {
                    completed += 1;
                    false
                }
            };

            let counted = !halted && !matches!(outcome, CommandOutcome::Skipped { .. });
            records.push(CommandRecord {
                command_id: command.id.clone(),
                kind: command.kind.clone(),
                outcome,
            });

            if halted {
                break;
            }

            self.publish_status();
            if counted && index + 1 < total {
                self.clock.sleep(self.settings.command_interval).await;
            }
        }

        if halt_reason == HaltReason::None {
            state = SequenceState::Completed;
        }
        self.last_halt = halt_reason;
        self.publish_status();

        SequenceResult {
            completed,
            total,
            halt_reason,
            state,
            records,
            events: self.rover.take_uncommitted_events(),
        }
    }

    async fn apply(&mut self, command: &Command) -> CommandOutcome {
        match &command.kind {
            CommandKind::MoveForward => {
                CommandOutcome::from_movement(self.rover.move_forward(&mut self.field))
            }
            CommandKind::MoveBackward => {
                CommandOutcome::from_movement(self.rover.move_backward(&mut self.field))
            }
            CommandKind::TurnLeft => CommandOutcome::from_turn(self.rover.turn_left()),
            CommandKind::TurnRight => CommandOutcome::from_turn(self.rover.turn_right()),
            CommandKind::Charge => {
                let checkpoints = self
                    .rover
                    .charge(
                        self.clock.as_ref(),
                        self.reporter.as_ref(),
                        self.settings.charge_step,
                    )
                    .await;
                CommandOutcome::Charged {
                    battery: self.rover.battery,
                    checkpoints,
                }
            }
            CommandKind::Scan => {
                let revealed = match self.settings.scan_radius {
                    Some(radius) => {
                        let hidden = self.field.hidden_count();
                        self.field.discover_in_radius(self.rover.position, radius);
                        hidden - self.field.hidden_count()
                    }
                    None => self.field.discover_all(),
                };
                self.rover.record_scan(revealed);
                CommandOutcome::ScanCompleted(self.field.scan())
            }
            CommandKind::ReturnToBase => CommandOutcome::Acknowledged {
                message: RETURN_TO_BASE_MESSAGE.to_string(),
            },
            CommandKind::Unrecognized(token) => CommandOutcome::Skipped {
                token: token.clone(),
            },
        }
    }

    fn publish_status(&self) {
        let status = RoverStatus::derive(
            &self.rover.snapshot(),
            self.last_halt,
            self.settings.critical_battery,
        );
        self.status_tx.send_replace(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::init_noop_logger;
    use crate::domains::rover::{EnergyCosts, InstantClock, LogReporter, World};
    use std::sync::Arc;

    fn sequencer(battery: u8, field: ObstacleField) -> CommandSequencer {
        let rover = RoverState::new(
            "rover-1".to_string(),
            field.world(),
            Position::new(0, 0),
            Orientation::North,
            battery,
            EnergyCosts::default(),
        )
        .unwrap();
        let logger = init_noop_logger();
        CommandSequencer::new(
            rover,
            field,
            Arc::new(InstantClock),
            Arc::new(LogReporter::new(logger.clone())),
            logger,
            SequencerSettings::default(),
        )
    }

    #[tokio::test]
    async fn empty_sequence_completes_immediately() {
        let mut sequencer = sequencer(100, ObstacleField::new(World::default()));
        let result = sequencer.run(&[]).await;

        assert_eq!(result.state, SequenceState::Completed);
        assert_eq!(result.completed, 0);
        assert_eq!(result.total, 0);
        assert!(result.events.is_empty());
    }

    #[tokio::test]
    async fn halting_command_is_not_counted() {
        let mut field = ObstacleField::new(World::default());
        field.add(Position::new(1, 0), 1).unwrap();
        let mut sequencer = sequencer(100, field);

        let commands = Command::sequence([
            CommandKind::TurnRight,
            CommandKind::MoveForward,
            CommandKind::TurnLeft,
        ]);
        let result = sequencer.run(&commands).await;

        assert_eq!(result.completed, 1);
        assert_eq!(result.state, SequenceState::HaltedObstacle(1));
        assert_eq!(result.records.len(), 2);
        assert_eq!(sequencer.rover().orientation, Orientation::East);
        assert!(sequencer.status().obstacle_detected);
    }

    #[tokio::test]
    async fn status_receiver_sees_the_final_snapshot() {
        let mut sequencer = sequencer(100, ObstacleField::new(World::default()));
        let receiver = sequencer.subscribe();

        sequencer
            .run(&Command::sequence([CommandKind::MoveForward, CommandKind::MoveForward]))
            .await;

        let status = receiver.borrow().clone();
        assert_eq!(status.position, Position::new(0, 2));
        assert_eq!(status.battery, 96);
    }
}
