use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};

/// Fixed timeout for a single probe
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Fallback description when a probe failure carries no message
pub const CONNECTION_ERROR: &str = "Connection Error";

/// Outcome of one completed probe, fed into the status transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { latency_ms: u64 },
    Failure { message: String },
}

impl ProbeOutcome {
    /// Convert a probe result into a definite outcome, applying the
    /// fallback message for errors with no description.
    pub fn from_result(result: Result<u64>) -> Self {
        match result {
            Ok(latency_ms) => ProbeOutcome::Success { latency_ms },
            Err(e) => {
                let message = e.to_string();
                let message = if message.trim().is_empty() {
                    CONNECTION_ERROR.to_string()
                } else {
                    message
                };
                ProbeOutcome::Failure { message }
            }
        }
    }
}

/// Probe trait so the engine can be driven without the network in tests
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Perform a single probe and return the measured latency in milliseconds
    async fn probe(&self, url: &str) -> Result<u64>;
}

/// HTTP/HTTPS probe
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<u64> {
        let start = Instant::now();

        // Any received response counts as reachable; this is an
        // availability check, not content validation.
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("{e}"))?;

        Ok(start.elapsed().as_millis() as u64)
    }
}
