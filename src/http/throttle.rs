use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Keeps consecutive requests at least `min_interval` apart
pub struct Throttle {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            last_request: None,
        }
    }

    /// Wait out the rest of the interval, then mark a request as sent
    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.ready_at() {
            sleep_until(ready_at).await;
        }
        self.last_request = Some(Instant::now());
    }

    fn ready_at(&self) -> Option<Instant> {
        self.last_request.map(|last| last + self.min_interval)
    }
}
