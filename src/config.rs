use crate::domains::mission::{SequencerSettings, DEFAULT_CRITICAL_BATTERY};
use crate::domains::rover::{
    EnergyCosts, ObstacleSeed, Orientation, Position, World, DEFAULT_SEEDS, DEFAULT_WORLD_SIZE,
    MAX_BATTERY,
};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub rover: RoverConfig,
    pub timing: TimingConfig,
    pub mission: MissionConfig,
    pub logging: LoggingConfig,
    pub kafka: KafkaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub size: i32,
    pub obstacles: Vec<ObstacleSeed>,
    #[serde(default)]
    pub random_obstacles: usize,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoverConfig {
    pub id: String,
    pub start_x: i32,
    pub start_y: i32,
    pub orientation: Orientation,
    pub battery: u8,
    pub move_cost: u8,
    pub turn_cost: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub command_interval_ms: u64,
    pub charge_step_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionConfig {
    pub queue_capacity: usize,
    pub critical_battery: u8,
    #[serde(default)]
    pub scan_radius: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<String>,
    pub level: String,
    pub buffer_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Only honoured by builds with the `kafka` feature.
    #[serde(default)]
    pub enabled: bool,
    pub brokers: Vec<String>,
    pub client_id: String,
    pub group_id: String,
    pub topics: KafkaTopics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaTopics {
    pub commands: String,
    pub acknowledgements: String,
    pub reports: String,
    pub status: String,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional TOML file, then `ROVER__SECTION__KEY` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Config::default())?;
        let mut builder = ::config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let config: Config = builder
            .add_source(
                ::config::Environment::with_prefix("ROVER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.size < 1 {
            bail!("world.size must be at least 1, got {}", self.world.size);
        }
        if self.rover.battery > MAX_BATTERY {
            bail!("rover.battery must be at most {}, got {}", MAX_BATTERY, self.rover.battery);
        }
        if self.rover.move_cost == 0 || self.rover.turn_cost == 0 {
            bail!("rover.move_cost and rover.turn_cost must be positive");
        }
        if self.mission.critical_battery > MAX_BATTERY {
            bail!("mission.critical_battery must be at most {}", MAX_BATTERY);
        }
        if let Some(radius) = self.mission.scan_radius {
            if radius < 0 {
                bail!("mission.scan_radius must not be negative, got {}", radius);
            }
        }
        if let Some(seed) = self.world.obstacles.iter().find(|o| o.size == 0) {
            bail!("obstacle at ({}, {}) has size 0", seed.x, seed.y);
        }
        Ok(())
    }

    pub fn world(&self) -> Result<World> {
        Ok(World::new(self.world.size)?)
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.rover.start_x, self.rover.start_y)
    }

    pub fn energy_costs(&self) -> EnergyCosts {
        EnergyCosts {
            movement: self.rover.move_cost,
            turn: self.rover.turn_cost,
        }
    }

    pub fn sequencer_settings(&self) -> SequencerSettings {
        SequencerSettings {
            command_interval: Duration::from_millis(self.timing.command_interval_ms),
            charge_step: Duration::from_millis(self.timing.charge_step_ms),
            scan_radius: self.mission.scan_radius,
            critical_battery: self.mission.critical_battery,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                size: DEFAULT_WORLD_SIZE,
                obstacles: DEFAULT_SEEDS.to_vec(),
                random_obstacles: 0,
                rng_seed: None,
            },
            rover: RoverConfig {
                id: "rover-1".to_string(),
                start_x: 0,
                start_y: 0,
                orientation: Orientation::North,
                battery: MAX_BATTERY,
                move_cost: 2,
                turn_cost: 1,
            },
            timing: TimingConfig {
                command_interval_ms: 300,
                charge_step_ms: 1000,
            },
            mission: MissionConfig {
                queue_capacity: 16,
                critical_battery: DEFAULT_CRITICAL_BATTERY,
                scan_radius: None,
            },
            logging: LoggingConfig {
                file: None,
                level: "info".to_string(),
                buffer_capacity: 256,
            },
            kafka: KafkaConfig {
                enabled: false,
                brokers: vec!["localhost:9092".to_string()],
                client_id: "rover-mission".to_string(),
                group_id: "rover-mission-group".to_string(),
                topics: KafkaTopics {
                    commands: "rover-commands".to_string(),
                    acknowledgements: "rover-acks".to_string(),
                    reports: "rover-reports".to_string(),
                    status: "rover-status".to_string(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world().unwrap().size(), DEFAULT_WORLD_SIZE);
        assert_eq!(config.world.obstacles.len(), 5);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = Config::default();
        config.world.size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rover.battery = 150;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rover.turn_cost = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.obstacles.push(ObstacleSeed { x: 1, y: 1, size: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn timing_maps_onto_sequencer_settings() {
        let mut config = Config::default();
        config.timing.command_interval_ms = 0;
        config.mission.scan_radius = Some(2);

        let settings = config.sequencer_settings();
        assert_eq!(settings.command_interval, Duration::ZERO);
        assert_eq!(settings.charge_step, Duration::from_millis(1000));
        assert_eq!(settings.scan_radius, Some(2));
    }
}
