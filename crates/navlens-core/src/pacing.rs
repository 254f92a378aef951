use std::time::Duration;

/// Delay applied between consecutive upstream page requests so a long
/// pagination run does not hammer the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPacer {
    delay: Duration,
}

impl FetchPacer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pacing, for tests and local replays.
    pub const fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Pause before fetching the next page. The first page of a run is never
    /// delayed.
    pub async fn pause(&self, completed_pages: usize) {
        if completed_pages > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for FetchPacer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_page_is_not_delayed() {
        let pacer = FetchPacer::new(Duration::from_secs(60));
        let started = std::time::Instant::now();
        pacer.pause(0).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn disabled_pacer_never_sleeps() {
        let pacer = FetchPacer::disabled();
        let started = std::time::Instant::now();
        pacer.pause(5).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
