// ABOUTME: HTTP transport posting the analysis request as multipart form data

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use super::{SubmissionError, SubmissionPayload, SubmissionReceipt, SubmissionTransport};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

/// Optional JSON body of a successful response
#[derive(Debug, Deserialize)]
struct AcceptedResponse {
    id: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;

        let client = Client::builder()
            .user_agent(concat!("analysis-wizard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(payload: SubmissionPayload) -> Form {
        let mut form = Form::new()
            .text("projectName", payload.project_name)
            .text("analysisDescription", payload.analysis_description);

        for file in payload.files {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.name));
        }

        form
    }
}

/// Endpoints must be absolute http(s) URLs
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL: {endpoint}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("Unsupported endpoint scheme '{other}' (expected http or https)")),
    }
}

fn map_request_error(e: &reqwest::Error) -> SubmissionError {
    if e.is_timeout() {
        SubmissionError::Timeout
    } else {
        SubmissionError::Transport(e.to_string())
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(
            "Posting analysis request to {} with {} file(s)",
            self.endpoint,
            payload.files.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(Self::build_form(payload))
            .send()
            .await
            .map_err(|e| {
                error!("Submission request failed: {}", e);
                map_request_error(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Submission rejected with {}: {}", status, body);
            let reason = if body.trim().is_empty() {
                status.to_string()
            } else {
                format!("{status}: {}", body.trim())
            };
            return Err(SubmissionError::Rejected(reason));
        }

        let body = response.text().await.map_err(|e| map_request_error(&e))?;
        let receipt = match serde_json::from_str::<AcceptedResponse>(&body) {
            Ok(AcceptedResponse { id: Some(id) }) => SubmissionReceipt::new(id),
            _ => SubmissionReceipt::generated(),
        };

        info!("Submission accepted with id {}", receipt.id);
        Ok(receipt)
    }
}
