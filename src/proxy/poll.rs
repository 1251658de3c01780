//! Poll scheduling for prediction status checks.

use std::time::Duration;

/// Bounded backoff schedule for polling a prediction.
///
/// The first wait is `initial_interval`; each following wait grows by
/// `multiplier` up to `max_interval`. At most `max_attempts` polls are made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            multiplier: 1.5,
            max_interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

impl PollPolicy {
    /// A policy that waits the same interval before every poll.
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            initial_interval: interval,
            multiplier: 1.0,
            max_interval: interval,
            max_attempts,
        }
    }

    /// Interval to wait after having waited `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let grown = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier.max(1.0))
            .unwrap_or(self.max_interval);
        grown.min(self.max_interval)
    }

    /// The waits preceding each poll, in order.
    pub fn intervals(&self) -> impl Iterator<Item = Duration> + '_ {
        let first = self.initial_interval.min(self.max_interval);
        std::iter::successors(Some(first), move |current| {
            Some(self.next_interval(*current))
        })
        .take(self.max_attempts as usize)
    }
}
