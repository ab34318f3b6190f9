//! Payment provider port.
//!
//! Contract for the upstream payment processor. The billing flow only
//! needs two calls: creating a payment intent for a single document and
//! creating a hosted checkout session for a subscription.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, UserId};

/// Port for the payment processor.
///
/// Implementations must not persist anything locally; ledger writes
/// happen after these calls return so a failed upstream call leaves no
/// pending rows behind.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a payment intent for a single-document purchase.
    ///
    /// The request metadata travels back on the confirmation webhook
    /// and is what ties the intent to a ledger row.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Creates a hosted checkout session for a recurring subscription.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Request to create a single-document payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub document_id: DocumentId,

    pub amount_cents: i64,

    pub currency: String,

    /// Authenticated purchaser, if any.
    pub user_id: Option<UserId>,

    /// Guest purchaser email, if any.
    pub guest_email: Option<String>,
}

/// Payment intent accepted by the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor intent id (pi_...).
    pub id: String,

    /// Client secret the frontend uses to confirm the payment.
    pub client_secret: String,
}

/// Request to create a subscription checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutSessionRequest {
    pub user_id: UserId,

    /// Processor price id for the chosen plan.
    pub price_id: String,

    pub plan_name: String,

    pub success_url: String,

    pub cancel_url: String,
}

/// Hosted checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Processor session id (cs_...).
    pub id: String,

    /// URL the customer is redirected to.
    pub url: String,
}

/// Errors from payment processor calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// Processor's own error code, when it sent one.
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Api, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(ErrorCode::PaymentProviderError, err.message)
    }
}

/// Categories of payment processor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Processor rejected the request.
    Api,
    /// Request did not complete in time.
    Timeout,
    /// Connection-level failure.
    Network,
    /// Processor answered with an unexpected body.
    InvalidResponse,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::Timeout | PaymentErrorCode::Network)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::Api => "api_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::Network => "network_error",
            PaymentErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn transport_failures_are_retryable() {
        assert!(PaymentError::network("reset").is_retryable());
        assert!(PaymentError::timeout("10s elapsed").is_retryable());
        assert!(!PaymentError::api("bad price id").is_retryable());
        assert!(!PaymentError::invalid_response("no client_secret").is_retryable());
    }

    #[test]
    fn payment_error_display_includes_code() {
        let err = PaymentError::api("No such price").with_provider_code("resource_missing");
        assert_eq!(err.to_string(), "api_error: No such price");
        assert_eq!(err.provider_code.as_deref(), Some("resource_missing"));
    }

    #[test]
    fn payment_error_converts_to_domain_error() {
        let err: DomainError = PaymentError::timeout("10s elapsed").into();
        assert_eq!(err.code, ErrorCode::PaymentProviderError);
        assert!(err.message.contains("10s elapsed"));
    }
}
