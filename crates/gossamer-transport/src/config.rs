//! Configuration for peer links

use std::time::Duration;

/// Configuration for a [`PeerLink`](crate::PeerLink).
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Fixed delay between reconnect attempts.
    ///
    /// There is no backoff growth and no attempt limit: an unreachable
    /// peer is retried forever at this interval.
    pub retry_delay: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl LinkConfig {
    /// Set the fixed reconnect delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_delay() {
        assert_eq!(LinkConfig::default().retry_delay, Duration::from_secs(2));
    }

    #[test]
    fn builder_overrides_delay() {
        let config = LinkConfig::default().with_retry_delay(Duration::from_millis(10));
        assert_eq!(config.retry_delay, Duration::from_millis(10));
    }
}
