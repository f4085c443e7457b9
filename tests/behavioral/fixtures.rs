// ABOUTME: Shared test fixtures for behavioral tests
//
// Provides:
// - CountingTransport: records every payload it is handed
// - quiet_config(): config with the reveal animation and latency turned off
// - temp_file(): file on disk with known content

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use analysis_wizard::config::AppConfig;
use analysis_wizard::transport::{
    SubmissionError, SubmissionPayload, SubmissionReceipt, SubmissionTransport,
};
use async_trait::async_trait;
use tempfile::NamedTempFile;

pub const NAME: &str = "ABC";
pub const DESCRIPTION: &str = "Quarterly churn analysis for the EU region";

/// Transport that counts calls and keeps the payloads it received
pub struct CountingTransport {
    calls: AtomicUsize,
    payloads: Mutex<Vec<SubmissionPayload>>,
    delay: Duration,
    failure: Option<String>,
}

impl CountingTransport {
    pub fn accepting() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            failure: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::accepting()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionTransport for CountingTransport {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.payloads.lock().unwrap().push(payload);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.failure {
            Some(reason) => Err(SubmissionError::Rejected(reason.clone())),
            None => Ok(SubmissionReceipt::new(format!("receipt-{call}"))),
        }
    }
}

/// Defaults with the animation off so no runtime is needed for the reveal
pub fn quiet_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.reveal.enabled = false;
    config.submission.simulated_latency_ms = 0;
    config
}

pub fn temp_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}
