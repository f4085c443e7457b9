// ABOUTME: Submission transport abstraction and payload types
// The wizard hands a packaged request to a transport and waits for one outcome

pub mod http;
pub mod simulated;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SubmissionConfig, SubmissionMode};
use crate::wizard::validation::FILE_TOO_LARGE;

pub use http::HttpTransport;
pub use simulated::SimulatedTransport;

/// One attached file as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Everything the transport needs to submit an analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub project_name: String,
    pub analysis_description: String,
    pub files: Vec<PayloadFile>,
}

impl SubmissionPayload {
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes.len()).sum()
    }
}

/// Acknowledgement returned by a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            submitted_at: Utc::now(),
        }
    }

    /// Receipt with a freshly generated id
    pub fn generated() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Submission rejected: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Failed to read {name}: {reason}")]
    FileRead { name: String, reason: String },
    #[error("{} ({name})", FILE_TOO_LARGE)]
    FileTooLarge { name: String },
    #[error("Submission timed out")]
    Timeout,
}

impl SubmissionError {
    /// Reason shown to the user. Transport outcomes carry the transport's own
    /// text; the prefixed `Display` form is kept for logs.
    pub fn reason(&self) -> String {
        match self {
            Self::Rejected(reason) | Self::Transport(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// External collaborator that delivers a submission
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Build the transport selected by configuration
pub fn from_config(config: &SubmissionConfig) -> Result<Arc<dyn SubmissionTransport>> {
    match config.mode {
        SubmissionMode::Simulated => Ok(Arc::new(SimulatedTransport::from_config(config))),
        SubmissionMode::Http => {
            let endpoint = config
                .endpoint
                .as_deref()
                .ok_or_else(|| anyhow!("submission.endpoint is required when mode = \"http\""))?;
            Ok(Arc::new(HttpTransport::new(endpoint, config.timeout())?))
        }
    }
}
