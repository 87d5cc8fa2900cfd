use super::sequencer::HaltReason;
use crate::domains::rover::{Command, Orientation, Position, RoverSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CRITICAL_BATTERY: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Warning,
    Critical,
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Health::Healthy => "healthy",
            Health::Warning => "warning",
            Health::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Whole-rover snapshot handed to readers. Always copied as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverStatus {
    pub position: Position,
    pub orientation: Orientation,
    pub battery: u8,
    pub health: Health,
    pub obstacle_detected: bool,
}

impl RoverStatus {
    /// A low battery outranks an obstacle warning.
    pub fn derive(snapshot: &RoverSnapshot, last_halt: HaltReason, critical_battery: u8) -> Self {
        let obstacle_detected = last_halt == HaltReason::ObstacleEncountered;
        let health = if snapshot.battery <= critical_battery {
            Health::Critical
        } else if obstacle_detected {
            Health::Warning
        } else {
            Health::Healthy
        };

        Self {
            position: snapshot.position,
            orientation: snapshot.orientation,
            battery: snapshot.battery,
            health,
            obstacle_detected,
        }
    }
}

impl fmt::Display for RoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position: {} | Orientation: {} | Battery: {}% | Health: {}",
            self.position, self.orientation, self.battery, self.health
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    pub completed: usize,
    pub total: usize,
    pub halt_reason: HaltReason,
    pub message: String,
}

/// Everything the core sends back through the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Ack { command: Command },
    Report(SequenceReport),
    Notice { message: String },
    Status(RoverStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(battery: u8) -> RoverSnapshot {
        RoverSnapshot {
            position: Position::new(1, 2),
            orientation: Orientation::East,
            battery,
            obstacle: None,
            battery_empty: false,
        }
    }

    #[test]
    fn health_follows_battery_and_last_halt() {
        let healthy = RoverStatus::derive(&snapshot(80), HaltReason::None, 20);
        assert_eq!(healthy.health, Health::Healthy);

        let warning = RoverStatus::derive(&snapshot(80), HaltReason::ObstacleEncountered, 20);
        assert_eq!(warning.health, Health::Warning);
        assert!(warning.obstacle_detected);

        let critical = RoverStatus::derive(&snapshot(20), HaltReason::ObstacleEncountered, 20);
        assert_eq!(critical.health, Health::Critical);
        assert!(critical.obstacle_detected);

        let drained = RoverStatus::derive(&snapshot(21), HaltReason::BatteryEmpty, 20);
        assert_eq!(drained.health, Health::Healthy);
    }

    #[test]
    fn outbound_messages_are_tagged() {
        let status = RoverStatus::derive(&snapshot(80), HaltReason::None, 20);
        let json = serde_json::to_value(OutboundMessage::Status(status)).unwrap();
        assert_eq!(json["type"], "status");
        assert_eq!(json["health"], "healthy");

        let notice = OutboundMessage::Notice {
            message: "hello".to_string(),
        };
        let json = serde_json::to_value(notice).unwrap();
        assert_eq!(json["type"], "notice");
        assert_eq!(json["message"], "hello");
    }
}
