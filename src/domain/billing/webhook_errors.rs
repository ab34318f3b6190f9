//! Webhook processing errors with status-code mapping.
//!
//! The status code controls the processor's redelivery behavior: 2xx
//! acknowledges, 4xx drops the event, 5xx triggers a retry. Events the
//! handler deliberately skips are not errors; they acknowledge through
//! the success path.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced while verifying or applying a webhook event.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature did not match the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Event timestamp is older than the replay window.
    #[error("Timestamp out of range")]
    StaleTimestamp,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    FutureTimestamp,

    /// Signature header or JSON payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Ledger write failed; the processor should redeliver.
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl WebhookError {
    /// True if the processor should retry delivering this event.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Ledger(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::StaleTimestamp => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::FutureTimestamp | WebhookError::Parse(_) => StatusCode::BAD_REQUEST,
            WebhookError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
