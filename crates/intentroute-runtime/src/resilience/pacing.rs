//! Request pacing for providers with a small per-minute budget.
//!
//! The pacer never retries and never tracks responses. It only inserts a
//! fixed wait before every request after the first, which keeps the start
//! of consecutive requests at least one delay apart.

use std::time::Duration;

use intentroute_core::ProviderConfig;
use tracing::debug;

/// Spaces out consecutive requests to one provider.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    delay: Option<Duration>,
    issued: usize,
}

impl RequestPacer {
    /// Create a pacer. `None` never waits.
    pub fn new(delay: Option<Duration>) -> Self {
        Self { delay, issued: 0 }
    }

    /// Pace according to the provider's request budget.
    pub fn for_config(config: &ProviderConfig) -> Self {
        Self::new(config.pacing_delay())
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    pub fn is_paced(&self) -> bool {
        self.delay.is_some()
    }

    /// Requests let through so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Wait until the next request may start.
    ///
    /// Returns the time slept, if any. The first call never sleeps.
    pub async fn wait_turn(&mut self) -> Option<Duration> {
        let wait = if self.issued > 0 { self.delay } else { None };
        self.issued += 1;

        if let Some(delay) = wait {
            debug!(delay = ?delay, request = self.issued, "Pacing request");
            tokio::time::sleep(delay).await;
        }

        wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentroute_core::ProviderKind;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn first_request_is_immediate() {
        let mut pacer = RequestPacer::new(Some(Duration::from_secs(12)));
        let start = Instant::now();

        assert_eq!(pacer.wait_turn().await, None);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(pacer.issued(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn later_requests_wait_the_delay() {
        let mut pacer = RequestPacer::for_config(&ProviderKind::Google.config());
        assert_eq!(pacer.delay(), Some(Duration::from_millis(12_500)));

        let start = Instant::now();
        pacer.wait_turn().await;
        pacer.wait_turn().await;
        pacer.wait_turn().await;

        assert!(start.elapsed() >= Duration::from_secs(25));
        assert_eq!(pacer.issued(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unpaced_never_waits() {
        let mut pacer = RequestPacer::for_config(&ProviderKind::Groq.config());
        assert!(!pacer.is_paced());

        let start = Instant::now();
        for _ in 0..5 {
            assert_eq!(pacer.wait_turn().await, None);
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
