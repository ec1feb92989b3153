use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use pcopp_common::alert::AlertEvent;

/// Delivery target for alert events. Each call is a single attempt.
#[async_trait]
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(&self, event: &AlertEvent) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{channel}: request failed: {source}")]
    Http {
        channel: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{channel}: rejected with status {status}")]
    Rejected { channel: &'static str, status: u16 },
}

impl NotifyError {
    /// Every outbound channel gets a bounded request so a silent endpoint
    /// cannot stall a scan cycle.
    pub(crate) fn client(channel: &'static str, timeout: Duration) -> Result<Client, Self> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Self::Http { channel, source })
    }

    pub(crate) fn from_response(channel: &'static str, result: Result<reqwest::Response, reqwest::Error>) -> Result<(), Self> {
        let resp = result.map_err(|source| Self::Http { channel, source })?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::Rejected {
                channel,
                status: status.as_u16(),
            })
        }
    }
}
