use super::charge::{ChargeCycle, MAX_BATTERY};
use super::events::RoverEvent;
use super::obstacles::{Obstacle, ObstacleField};
use super::ports::{Clock, StatusReporter};
use super::types::{Orientation, Position, World};
use crate::common::{AggregateRoot, DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyCosts {
    pub movement: u8,
    pub turn: u8,
}

impl Default for EnergyCosts {
    fn default() -> Self {
        Self {
            movement: 2,
            turn: 1,
        }
    }
}

/// Result of a single transition, taken after the transition was (or was not) committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverSnapshot {
    pub position: Position,
    pub orientation: Orientation,
    pub battery: u8,
    pub obstacle: Option<Obstacle>,
    pub battery_empty: bool,
}

impl RoverSnapshot {
    pub fn obstacle_detected(&self) -> bool {
        self.obstacle.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoverState {
    pub id: String,
    pub position: Position,
    pub orientation: Orientation,
    pub battery: u8,
    pub costs: EnergyCosts,
    pub world: World,
    pub version: u64,
    #[serde(skip)]
    uncommitted_events: Vec<RoverEvent>,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

impl RoverState {
    pub fn new(
        id: String,
        world: World,
        position: Position,
        orientation: Orientation,
        battery: u8,
        costs: EnergyCosts,
    ) -> DomainResult<Self> {
        if battery > MAX_BATTERY {
            return Err(DomainError::InvalidCommand {
                reason: format!("Battery must be between 0 and {}, got {}", MAX_BATTERY, battery),
            });
        }

        let position = world.wrap(position);
        let mut rover = Self {
            id: id.clone(),
            position,
            orientation,
            battery,
            costs,
            world,
            version: 0,
            uncommitted_events: Vec::new(),
        };

        let event = RoverEvent::RoverDeployed {
            rover_id: id,
            position,
            orientation,
            battery,
            timestamp: chrono::Utc::now(),
        };

        rover.add_event(event);
        Ok(rover)
    }

    /// Rebuilds a rover by replaying a recorded event stream onto `initial`.
    pub fn from_history(mut initial: RoverState, events: &[RoverEvent]) -> DomainResult<Self> {
        initial.mark_events_as_committed();
        for event in events {
            initial.apply(event)?;
        }
        Ok(initial)
    }

    pub fn snapshot(&self) -> RoverSnapshot {
        RoverSnapshot {
            position: self.position,
            orientation: self.orientation,
            battery: self.battery,
            obstacle: None,
            battery_empty: false,
        }
    }

    pub fn move_forward(&mut self, field: &mut ObstacleField) -> RoverSnapshot {
        self.step(Direction::Forward, field)
    }

    pub fn move_backward(&mut self, field: &mut ObstacleField) -> RoverSnapshot {
        self.step(Direction::Backward, field)
    }

    pub fn turn_left(&mut self) -> RoverSnapshot {
        let target = self.orientation.left();
        self.turn(target)
    }

    pub fn turn_right(&mut self) -> RoverSnapshot {
        let target = self.orientation.right();
        self.turn(target)
    }

    /// Solar recharge through the checkpoints of `ChargeCycle`, waiting
    /// `step_delay` before each one and notifying `reporter` as it is reached.
    pub async fn charge(
        &mut self,
        clock: &dyn Clock,
        reporter: &dyn StatusReporter,
        step_delay: Duration,
    ) -> Vec<u8> {
        let cycle = ChargeCycle::start(self.battery);
        if cycle.is_already_full() {
            reporter.notify("Battery already full").await;
            return Vec::new();
        }

        let mut reached = Vec::new();
        for level in cycle {
            clock.sleep(step_delay).await;
            self.battery = level;
            reached.push(level);

            self.add_event(RoverEvent::BatteryCharged {
                rover_id: self.id.clone(),
                battery: level,
                timestamp: chrono::Utc::now(),
            });

            if level >= MAX_BATTERY {
                reporter.notify("Battery fully charged (100%)").await;
            } else {
                reporter
                    .notify(&format!("Solar charging in progress: battery at {}%", level))
                    .await;
            }
        }
        reached
    }

    pub fn record_scan(&mut self, discovered: usize) {
        self.add_event(RoverEvent::AreaScanned {
            rover_id: self.id.clone(),
            center: self.position,
            discovered,
            timestamp: chrono::Utc::now(),
        });
    }

    fn step(&mut self, direction: Direction, field: &mut ObstacleField) -> RoverSnapshot {
        let (dx, dy) = self.orientation.delta();
        let delta = match direction {
            Direction::Forward => (dx, dy),
            Direction::Backward => (-dx, -dy),
        };
        let destination = self.world.step(self.position, delta);

        if self.battery < self.costs.movement {
            return self.depleted(self.costs.movement);
        }

        if let Some(obstacle) = field.check_obstacle_at(destination) {
            self.add_event(RoverEvent::MoveBlocked {
                rover_id: self.id.clone(),
                obstacle_id: obstacle.id,
                at: destination,
                timestamp: chrono::Utc::now(),
            });
            let mut snapshot = self.snapshot();
            snapshot.obstacle = Some(obstacle);
            return snapshot;
        }

        let from = self.position;
        self.position = destination;
        self.battery = self.battery.saturating_sub(self.costs.movement);

        self.add_event(RoverEvent::Moved {
            rover_id: self.id.clone(),
            from,
            to: destination,
            battery: self.battery,
            timestamp: chrono::Utc::now(),
        });
        self.snapshot()
    }

    fn turn(&mut self, target: Orientation) -> RoverSnapshot {
        if self.battery < self.costs.turn.max(1) {
            return self.depleted(self.costs.turn.max(1));
        }

        let from = self.orientation;
        self.orientation = target;
        self.battery = self.battery.saturating_sub(self.costs.turn);

        self.add_event(RoverEvent::Turned {
            rover_id: self.id.clone(),
            from,
            to: target,
            battery: self.battery,
            timestamp: chrono::Utc::now(),
        });
        self.snapshot()
    }

    fn depleted(&mut self, required: u8) -> RoverSnapshot {
        self.add_event(RoverEvent::BatteryDepleted {
            rover_id: self.id.clone(),
            battery: self.battery,
            required,
            timestamp: chrono::Utc::now(),
        });
        let mut snapshot = self.snapshot();
        snapshot.battery_empty = true;
        snapshot
    }
}

impl AggregateRoot for RoverState {
    type Event = RoverEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            RoverEvent::RoverDeployed {
                rover_id,
                position,
                orientation,
                battery,
                ..
            } => {
                self.id = rover_id.clone();
                self.position = self.world.wrap(*position);
                self.orientation = *orientation;
                self.battery = (*battery).min(MAX_BATTERY);
            }
            RoverEvent::Moved { to, battery, .. } => {
                if !self.world.contains(*to) {
                    return Err(DomainError::InvalidCommand {
                        reason: format!("Recorded move leaves the grid: {}", to),
                    });
                }
                self.position = *to;
                self.battery = *battery;
            }
            RoverEvent::Turned { to, battery, .. } => {
                self.orientation = *to;
                self.battery = *battery;
            }
            RoverEvent::BatteryCharged { battery, .. } => {
                self.battery = (*battery).min(MAX_BATTERY);
            }
            RoverEvent::MoveBlocked { .. }
            | RoverEvent::BatteryDepleted { .. }
            | RoverEvent::AreaScanned { .. } => {}
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::rover::ports::InstantClock;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CaptureReporter {
        notices: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatusReporter for CaptureReporter {
        async fn notify(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }
    }

    fn rover(battery: u8) -> RoverState {
        RoverState::new(
            "rover-1".to_string(),
            World::new(10).unwrap(),
            Position::new(0, 0),
            Orientation::North,
            battery,
            EnergyCosts::default(),
        )
        .unwrap()
    }

    #[test]
    fn deploy_records_an_event() {
        let rover = rover(100);
        assert_eq!(rover.uncommitted_events().len(), 1);
        match &rover.uncommitted_events()[0] {
            RoverEvent::RoverDeployed { rover_id, battery, .. } => {
                assert_eq!(rover_id, "rover-1");
                assert_eq!(*battery, 100);
            }
            _ => panic!("Expected RoverDeployed event"),
        }
    }

    #[test]
    fn battery_above_maximum_is_rejected() {
        let result = RoverState::new(
            "rover-1".to_string(),
            World::default(),
            Position::new(0, 0),
            Orientation::North,
            101,
            EnergyCosts::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn move_commits_and_costs_energy() {
        let mut rover = rover(100);
        let mut field = ObstacleField::new(rover.world);

        let snapshot = rover.move_forward(&mut field);
        assert_eq!(snapshot.position, Position::new(0, 1));
        assert_eq!(snapshot.battery, 98);
        assert!(!snapshot.obstacle_detected());

        let snapshot = rover.move_backward(&mut field);
        assert_eq!(snapshot.position, Position::new(0, 0));
        assert_eq!(snapshot.battery, 96);
    }

    #[test]
    fn backward_move_wraps_below_zero() {
        let mut rover = rover(100);
        let mut field = ObstacleField::new(rover.world);

        let snapshot = rover.move_backward(&mut field);
        assert_eq!(snapshot.position, Position::new(0, 9));
    }

    #[test]
    fn blocked_move_is_free_and_discovers() {
        let mut rover = rover(100);
        let mut field = ObstacleField::new(rover.world);
        let id = field.add(Position::new(0, 1), 1).unwrap();

        let snapshot = rover.move_forward(&mut field);

        assert_eq!(snapshot.position, Position::new(0, 0));
        assert_eq!(snapshot.battery, 100);
        assert_eq!(snapshot.obstacle.as_ref().map(|o| o.id), Some(id));
        assert_eq!(field.scan().len(), 1);
    }

    #[test]
    fn insufficient_battery_checks_before_probing() {
        let mut rover = rover(1);
        let mut field = ObstacleField::new(rover.world);
        field.add(Position::new(0, 1), 1).unwrap();

        let snapshot = rover.move_forward(&mut field);

        assert!(snapshot.battery_empty);
        assert!(!snapshot.obstacle_detected());
        assert_eq!(snapshot.battery, 1);
        assert!(field.scan().is_empty());
    }

    #[test]
    fn turns_drain_battery_then_stop() {
        let mut rover = rover(3);
        let mut expected = 3;

        while expected > 0 {
            let snapshot = rover.turn_right();
            expected -= 1;
            assert!(!snapshot.battery_empty);
            assert_eq!(snapshot.battery, expected);
        }

        let orientation = rover.orientation;
        let snapshot = rover.turn_left();
        assert!(snapshot.battery_empty);
        assert_eq!(snapshot.orientation, orientation);
        assert_eq!(snapshot.battery, 0);
    }

    #[tokio::test]
    async fn charge_reports_each_checkpoint() {
        let mut rover = rover(12);
        let reporter = CaptureReporter {
            notices: Mutex::new(Vec::new()),
        };

        let reached = rover
            .charge(&InstantClock, &reporter, Duration::from_millis(1000))
            .await;

        assert_eq!(reached, vec![50, 100]);
        assert_eq!(rover.battery, 100);
        let notices = reporter.notices.lock().unwrap();
        assert_eq!(notices.len(), 2);
        assert!(notices[0].contains("50%"));
        assert!(notices[1].contains("fully charged"));
    }

    #[tokio::test]
    async fn charge_when_full_is_a_noop() {
        let mut rover = rover(100);
        let reporter = CaptureReporter {
            notices: Mutex::new(Vec::new()),
        };

        let reached = rover.charge(&InstantClock, &reporter, Duration::ZERO).await;

        assert!(reached.is_empty());
        assert_eq!(rover.battery, 100);
        assert_eq!(
            *reporter.notices.lock().unwrap(),
            vec!["Battery already full".to_string()]
        );
    }

    #[test]
    fn history_replay_rebuilds_the_state() {
        let mut rover = rover(100);
        let initial = rover.clone();
        let mut field = ObstacleField::new(rover.world);
        field.add(Position::new(1, 1), 1).unwrap();

        rover.move_forward(&mut field);
        rover.turn_right();
        rover.move_forward(&mut field);
        rover.move_backward(&mut field);
        rover.move_forward(&mut field);

        let events = rover.take_uncommitted_events();
        let rebuilt = RoverState::from_history(initial, &events).unwrap();

        assert_eq!(rebuilt.position, rover.position);
        assert_eq!(rebuilt.orientation, rover.orientation);
        assert_eq!(rebuilt.battery, rover.battery);
        assert_eq!(rebuilt.version, events.len() as u64);
    }
}
