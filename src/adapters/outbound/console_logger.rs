use crate::domains::logger::DomainLogger;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Forwards domain log lines to `tracing` under the `rover_mission::domain` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "rover_mission::domain", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "rover_mission::domain", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "rover_mission::domain", "{}", msg);
    }
}

/// Console logger backed by whatever `tracing` subscriber the binary installed.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge)
}

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
/// Leaves the `log` facade free so the `fast_log` file backend can still claim it.
pub fn init_tracing() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(tracing_subscriber::fmt().with_env_filter(filter).finish())
}
