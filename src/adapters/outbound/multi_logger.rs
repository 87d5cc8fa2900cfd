use crate::domains::logger::DomainLogger;
use log::LevelFilter;
use std::sync::Arc;

/// Fans every line out to each of its sinks, in order.
pub struct MultiLogger {
    sinks: Vec<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<Arc<dyn DomainLogger>>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.error(msg));
    }
}

/// Console logging, plus the mission log file when `path` is given and the file
/// logger can be installed. Falls back to console only otherwise.
pub fn init_combined_logger(path: Option<&str>, level: LevelFilter) -> Arc<dyn DomainLogger> {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };

    match super::init_file_logger(path, level) {
        Ok(file) => Arc::new(MultiLogger::new(vec![console, file])),
        Err(e) => {
            console.warn(&format!("File logging disabled: {}", e));
            console
        }
    }
}
