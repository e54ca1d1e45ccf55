// Shared transport configuration for building reqwest::Client instances.
//
// Carries the per-request timeout and the collaborator-boundary retry
// policy. The settle delay between AP calls is a session concern and
// lives in apcommand-core.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("apcommand/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for a single HTTP call.
    pub timeout: Duration,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    /// Base pause between attempts; attempt `n` waits `n * retry_backoff`.
    pub retry_backoff: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))
    }

    /// Pause before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(attempt)
    }
}
