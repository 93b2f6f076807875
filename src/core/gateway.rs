//! Submission Gateway
//!
//! Contract for handing a completed booking draft to the remote
//! booking-creation endpoint, plus the HTTP implementation used in
//! production. Failures are surfaced verbatim and the draft is left
//! untouched so the user can retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::booking::BookingDraft;

/// Opaque confirmation returned by the booking-creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Remote identifier for the created booking.
    pub booking_id: String,
    /// Optional human-readable reference from the backend.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Failure from the submission endpoint, surfaced to the user as-is.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error("Booking submission rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Booking submission failed: {0}")]
    Network(String),
}

/// Accepts a complete booking draft and creates the booking remotely.
///
/// Implementations must not retry internally; the wizard preserves the
/// draft on failure and the user re-attempts explicitly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, draft: &BookingDraft) -> Result<BookingConfirmation, SubmissionError>;
}

/// HTTP gateway posting the draft as JSON to the configured endpoint.
pub struct HttpSubmissionGateway {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSubmissionGateway {
    /// Build a gateway for the given endpoint URL.
    pub fn new(endpoint: &str, timeout: std::time::Duration) -> Result<Self, SubmissionError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SubmissionError::Network(format!("invalid endpoint {endpoint}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::Network(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, draft: &BookingDraft) -> Result<BookingConfirmation, SubmissionError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(draft)
            .send()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<BookingConfirmation>()
            .await
            .map_err(|e| SubmissionError::Network(format!("malformed confirmation: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_endpoint() {
        let result =
            HttpSubmissionGateway::new("not a url", std::time::Duration::from_secs(5));
        assert!(matches!(result, Err(SubmissionError::Network(_))));
    }

    #[test]
    fn test_confirmation_tolerates_missing_reference() {
        let confirmation: BookingConfirmation =
            serde_json::from_str(r#"{"booking_id":"bk-123"}"#).unwrap();
        assert_eq!(confirmation.booking_id, "bk-123");
        assert!(confirmation.reference.is_none());
    }
}
