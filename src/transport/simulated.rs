// ABOUTME: Simulated transport that waits a fixed latency and then acknowledges

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{SubmissionError, SubmissionPayload, SubmissionReceipt, SubmissionTransport};
use crate::config::SubmissionConfig;

#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    latency: Duration,
    failure: Option<String>,
}

impl SimulatedTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
        }
    }

    /// Always fail with the given reason after the latency elapses
    pub fn failing(latency: Duration, reason: impl Into<String>) -> Self {
        Self {
            latency,
            failure: Some(reason.into()),
        }
    }

    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.simulated_latency_ms),
            failure: config.simulated_failure.clone(),
        }
    }
}

#[async_trait]
impl SubmissionTransport for SimulatedTransport {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(
            "Simulating submission of '{}' with {} file(s), {} bytes",
            payload.project_name,
            payload.files.len(),
            payload.total_bytes()
        );

        tokio::time::sleep(self.latency).await;

        if let Some(reason) = &self.failure {
            return Err(SubmissionError::Rejected(reason.clone()));
        }

        let receipt = SubmissionReceipt::generated();
        info!("Simulated submission accepted with id {}", receipt.id);
        Ok(receipt)
    }
}
