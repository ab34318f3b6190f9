//! HTTP DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a single-document purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSinglePaymentRequest {
    /// The document being purchased.
    pub document_id: String,
    /// Price override in cents; defaults to the single-document price.
    #[serde(default)]
    pub amount_cents: Option<i64>,
    /// Guest email, for unauthenticated purchases.
    #[serde(default)]
    pub guest_email: Option<String>,
}

/// Request to start a subscription checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// The plan to subscribe to: `basic`, `pro`, or `enterprise`.
    pub plan_type: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for purchase initiation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSinglePaymentResponse {
    /// Client secret used by the frontend to confirm the payment.
    pub client_secret: String,
    /// The pending purchase's ledger id.
    pub purchase_id: String,
    /// Price charged, in cents.
    pub amount_cents: i64,
}

/// Response for subscription checkout initiation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    /// The hosted checkout URL to redirect to.
    pub checkout_url: String,
}

/// Response for subscription status checks.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusResponse {
    pub subscribed: bool,
    /// Plan name, when subscribed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// End of the current billing period (ISO 8601), when subscribed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<String>,
}

/// Acknowledgement body for webhook deliveries.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}
