use rand::Rng;
use std::time::{Duration, Instant};
use tracing::info;

/// Logs when a labelled stage starts and, on drop, how long it ran.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  {} started", label);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("⏱  {} finished in {:.2?}", self.label, self.start.elapsed());
    }
}

/// Pause between two requests: the fixed delay plus up to `jitter_ms` of random slack.
pub fn pacing_delay(delay_ms: u64, jitter_ms: u64) -> Duration {
    let jitter = if jitter_ms == 0 {
        0
    } else {
        rand::rng().random_range(0..=jitter_ms)
    };
    Duration::from_millis(delay_ms + jitter)
}
