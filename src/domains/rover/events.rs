use super::types::{Orientation, Position};
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoverEvent {
    RoverDeployed {
        rover_id: String,
        position: Position,
        orientation: Orientation,
        battery: u8,
        timestamp: DateTime<Utc>,
    },
    Moved {
        rover_id: String,
        from: Position,
        to: Position,
        battery: u8,
        timestamp: DateTime<Utc>,
    },
    MoveBlocked {
        rover_id: String,
        obstacle_id: Uuid,
        at: Position,
        timestamp: DateTime<Utc>,
    },
    Turned {
        rover_id: String,
        from: Orientation,
        to: Orientation,
        battery: u8,
        timestamp: DateTime<Utc>,
    },
    BatteryDepleted {
        rover_id: String,
        battery: u8,
        required: u8,
        timestamp: DateTime<Utc>,
    },
    BatteryCharged {
        rover_id: String,
        battery: u8,
        timestamp: DateTime<Utc>,
    },
    AreaScanned {
        rover_id: String,
        center: Position,
        discovered: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for RoverEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RoverEvent::RoverDeployed { .. } => "RoverDeployed",
            RoverEvent::Moved { .. } => "Moved",
            RoverEvent::MoveBlocked { .. } => "MoveBlocked",
            RoverEvent::Turned { .. } => "Turned",
            RoverEvent::BatteryDepleted { .. } => "BatteryDepleted",
            RoverEvent::BatteryCharged { .. } => "BatteryCharged",
            RoverEvent::AreaScanned { .. } => "AreaScanned",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            RoverEvent::RoverDeployed { rover_id, .. }
            | RoverEvent::Moved { rover_id, .. }
            | RoverEvent::MoveBlocked { rover_id, .. }
            | RoverEvent::Turned { rover_id, .. }
            | RoverEvent::BatteryDepleted { rover_id, .. }
            | RoverEvent::BatteryCharged { rover_id, .. }
            | RoverEvent::AreaScanned { rover_id, .. } => rover_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RoverEvent::RoverDeployed { timestamp, .. }
            | RoverEvent::Moved { timestamp, .. }
            | RoverEvent::MoveBlocked { timestamp, .. }
            | RoverEvent::Turned { timestamp, .. }
            | RoverEvent::BatteryDepleted { timestamp, .. }
            | RoverEvent::BatteryCharged { timestamp, .. }
            | RoverEvent::AreaScanned { timestamp, .. } => *timestamp,
        }
    }
}
