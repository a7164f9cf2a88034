//! Request spacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Keeps consecutive TMDB requests at least `min_interval` apart.
///
/// TMDB allows roughly 40 requests per second per IP. A browse session
/// issues a handful of requests per user action, so a fixed spacing is
/// all that is needed.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// When the previous request was released.
    last_release: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: None,
        }
    }

    /// Creates a limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Returns how long a request issued at `now` has to wait.
    fn delay_at(&self, now: Instant) -> Duration {
        self.last_release.map_or(Duration::ZERO, |last| {
            self.min_interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Waits for the next request slot and claims it.
    pub async fn wait(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis(), "throttling TMDB request");
            tokio::time::sleep(delay).await;
        }
        self.last_release = Some(Instant::now());
    }
}
