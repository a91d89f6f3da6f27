use std::time::Duration;

pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed spacing between consecutive calls of a batch.
///
/// The interval is constant on purpose: batches are small and human
/// triggered, and the timing it produces is part of the observable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    interval: Duration,
}

impl PacingPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delay to wait after item `index` before starting the next one.
    /// Zero after the last item.
    pub fn delay_before_next(&self, index: usize, total: usize) -> Duration {
        if index + 1 < total {
            self.interval
        } else {
            Duration::ZERO
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_PACING_INTERVAL)
    }
}
