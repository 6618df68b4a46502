//! Report submission over HTTP.

use async_trait::async_trait;
use geo_report_models::{ReportAck, ReportSubmission};
use thiserror::Error;

/// Errors from submitting a report.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success envelope. `message` holds
    /// the server-provided error string, empty when the server gave none.
    #[error("submission rejected: {message}")]
    Rejected {
        /// Server-provided error description, possibly empty.
        message: String,
    },
}

/// Seam through which the controller submits an assembled report.
#[async_trait]
pub trait SubmitReport: Send + Sync {
    /// Submits one report and returns the server's envelope.
    async fn submit(&self, report: &ReportSubmission) -> Result<ReportAck, SubmitError>;
}

/// Submits reports to a report endpoint as JSON.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    /// Creates a submitter posting to `endpoint` (e.g. `"/api/report"`
    /// resolved against the page origin).
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SubmitReport for HttpSubmitter {
    async fn submit(&self, report: &ReportSubmission) -> Result<ReportAck, SubmitError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(report)
            .send()
            .await?;
        let status = resp.status();

        // An undecodable body still counts as a rejection unless the
        // status is a success and the envelope says so.
        let ack: ReportAck = resp.json().await.unwrap_or(ReportAck {
            success: false,
            error: None,
        });

        if !status.is_success() || !ack.success {
            return Err(SubmitError::Rejected {
                message: ack.error.unwrap_or_default(),
            });
        }
        Ok(ack)
    }
}
