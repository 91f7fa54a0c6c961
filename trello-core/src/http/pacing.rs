// Request pacing to stay under the remote rate limiter

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Pause point awaited before every outgoing request.
///
/// This is a throttle, not a correctness mechanism: the remote API rate
/// limits aggressive callers, so the workflow spaces its calls out.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Waits a fixed interval before every request.
#[derive(Debug, Clone)]
pub struct FixedIntervalPacer {
    interval: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The 2.5s spacing the board lifecycle uses between its calls.
    pub fn workflow_default() -> Self {
        Self::new(Duration::from_millis(2500))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pause(&self) {
        debug!(interval_ms = self.interval.as_millis() as u64, "pacing request");
        tokio::time::sleep(self.interval).await;
    }
}

/// No pacing; used by tests.
#[derive(Debug, Clone, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self) {}
}
