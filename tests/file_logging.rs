use log::LevelFilter;
use rover_mission::adapters::outbound::{init_combined_logger, init_tracing};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

// Global subscriber and `log` backend: keep this the only test in the binary.
#[test]
fn test_file_logger_still_installs_after_tracing_setup() {
    init_tracing().unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("mission.log");
    let logger = init_combined_logger(path.to_str(), LevelFilter::Info);

    logger.info("Obstacle field ready: 5 obstacles on a 20x20 grid");
    log::logger().flush();

    let mut contents = String::new();
    for _ in 0..50 {
        contents = fs::read_to_string(&path).unwrap_or_default();
        if contents.contains("Obstacle field ready") {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(contents.contains("Obstacle field ready: 5 obstacles on a 20x20 grid"));
}
