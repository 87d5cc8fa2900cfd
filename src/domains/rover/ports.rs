use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Time source for the simulated delays (charge checkpoints, command pacing).
/// Tests inject a clock that never sleeps.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub type DynClock = Arc<dyn Clock>;

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

pub struct InstantClock;

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _duration: Duration) {}
}

/// Receives progress notices while an operation is suspended (charge checkpoints).
/// Non-fallible from the domain's point of view; adapters log their own failures.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn notify(&self, message: &str);
}

pub type DynReporter = Arc<dyn StatusReporter>;

/// Reporter that writes notices to a domain logger.
pub struct LogReporter {
    logger: crate::domains::DynLogger,
}

impl LogReporter {
    pub fn new(logger: crate::domains::DynLogger) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl StatusReporter for LogReporter {
    async fn notify(&self, message: &str) {
        self.logger.info(message);
    }
}
