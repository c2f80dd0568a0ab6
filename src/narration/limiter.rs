use std::time::{Duration, Instant};

use tokio_retry2::strategy::{ExponentialBackoff, jitter};

use crate::narration::provider::ProviderError;

/// Enforces a minimum interval between consecutive requests by sleeping.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    /// Limiter that never lets two requests start closer than `min_interval`.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Block until a request may start, then mark it started. Returns the time slept.
    pub fn wait(&mut self) -> Duration {
        let mut slept = Duration::ZERO;
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                slept = self.min_interval - elapsed;
                std::thread::sleep(slept);
            }
        }
        self.last = Some(Instant::now());
        slept
    }
}

/// Longest single wait between two attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Bounded exponential backoff for transient provider failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled after each one.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Nominal wait before each retry, before jitter: `initial_backoff`, then doubling, capped
    /// at one minute. Yields exactly `max_retries` delays.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> {
        let initial = self.initial_backoff.min(MAX_BACKOFF);
        let millis = u64::try_from(initial.as_millis()).unwrap_or(u64::MAX);
        // from_millis(2) yields 2, 4, 8.. times the factor.
        let doubling = ExponentialBackoff::from_millis(2)
            .factor(millis)
            .max_delay(MAX_BACKOFF);
        std::iter::once(initial)
            .chain(doubling)
            .take(self.max_retries as usize)
    }

    /// Run `attempt` until it succeeds, fails permanently, or retries run out.
    ///
    /// `attempt` receives the zero-based attempt number. Waits follow [`Self::schedule`] with
    /// jitter applied.
    pub fn run<T>(
        &self,
        mut attempt: impl FnMut(u32) -> Result<T, ProviderError>,
    ) -> Result<T, ProviderError> {
        let mut delays = self.schedule().map(jitter);
        let mut n = 0;
        loop {
            match attempt(n) {
                Ok(v) => return Ok(v),
                Err(e) if e.is_transient() => {
                    let Some(delay) = delays.next() else {
                        return Err(e);
                    };
                    tracing::warn!(attempt = n + 1, ?delay, "narration provider: {e}; retrying");
                    std::thread::sleep(delay);
                    n += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/limiter.rs"]
mod tests;
