use rover_mission::adapters::inbound::decode_command_frame;
use rover_mission::domains::mission::{Health, OutboundMessage, RoverStatus};
use rover_mission::domains::rover::{CommandKind, Orientation, Position};
use rover_mission::Config;
use std::fs;
use tempfile::tempdir;

const SAMPLE_CONFIG: &str = r#"
[world]
size = 30
obstacles = [{ x = 4, y = 4, size = 1 }]
random_obstacles = 3
rng_seed = 7

[rover]
id = "rover-7"
start_x = 2
start_y = 3
orientation = "East"
battery = 80
move_cost = 3
turn_cost = 1

[timing]
command_interval_ms = 0
charge_step_ms = 10

[mission]
queue_capacity = 4
critical_battery = 25
scan_radius = 5

[logging]
level = "debug"
buffer_capacity = 32

[kafka]
brokers = ["broker:9092"]
client_id = "rover-7"
group_id = "rover-7-group"

[kafka.topics]
commands = "cmd"
acknowledgements = "ack"
reports = "rep"
status = "stat"
"#;

#[test]
fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rover.toml");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    let config = tokio_test::block_on(Config::from_file(&path)).unwrap();

    assert_eq!(config.world.size, 30);
    assert_eq!(config.world.obstacles.len(), 1);
    assert_eq!(config.rover.orientation, Orientation::East);
    assert_eq!(config.start_position(), Position::new(2, 3));
    assert_eq!(config.energy_costs().movement, 3);
    assert_eq!(config.sequencer_settings().scan_radius, Some(5));
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
    assert_eq!(config.kafka.topics.status, "stat");
}

#[test]
fn test_config_from_file_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rover.toml");
    fs::write(&path, SAMPLE_CONFIG.replace("battery = 80", "battery = 180")).unwrap();

    assert!(tokio_test::block_on(Config::from_file(&path)).is_err());
}

#[test]
fn test_config_load_layers_file_over_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rover.toml");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.world.size, 30);
    assert_eq!(config.rover.id, "rover-7");

    let defaults = Config::load(None).unwrap();
    assert_eq!(defaults.world.obstacles.len(), 5);
}

#[test]
fn test_frame_with_legacy_and_named_tokens() {
    let frame = r#"[
        {"id":"c1","kind":"Z","timestamp":"2024-05-01T10:00:00Z"},
        {"id":"c2","kind":"turn_right","timestamp":"2024-05-01T10:00:01Z"},
        {"id":"c3","kind":"hover","timestamp":"2024-05-01T10:00:02Z"}
    ]"#;

    let commands = decode_command_frame(frame).unwrap();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0].kind, CommandKind::MoveForward);
    assert_eq!(commands[1].kind, CommandKind::TurnRight);
    assert_eq!(commands[2].kind, CommandKind::Unrecognized("hover".to_string()));
}

#[test]
fn test_status_message_wire_shape() {
    let message = OutboundMessage::Status(RoverStatus {
        position: Position::new(1, 2),
        orientation: Orientation::West,
        battery: 15,
        health: Health::Critical,
        obstacle_detected: false,
    });

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["type"], "status");
    assert_eq!(value["health"], "critical");
    assert_eq!(value["battery"], 15);
}
