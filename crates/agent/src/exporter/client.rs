use reqwest::{Client, StatusCode};
use std::time::Duration;

use pcopp_common::telemetry::TelemetryRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected telemetry with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Posts telemetry documents to the ingestion endpoint.
pub struct IngestClient {
    url: String,
    client: Client,
}

impl IngestClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ExportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send(&self, record: &TelemetryRecord) -> Result<StatusCode, ExportError> {
        let resp = self.client.post(&self.url).json(record).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(status);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ExportError::Rejected { status, body })
    }
}
