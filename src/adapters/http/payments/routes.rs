//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    check_subscription, create_single_payment, create_subscription, handle_webhook,
    PaymentsAppState,
};

/// Create the payment API router.
///
/// # Routes
///
/// ## Public Endpoints
/// - `POST /create-single-payment` - Start a single-document purchase
///   (guests pass `guest_email`)
///
/// ## User Endpoints (require authentication)
/// - `POST /create-subscription` - Start a subscription checkout
/// - `GET /check-subscription` - Report current subscription state
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - Handle payment processor events
pub fn payments_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/create-single-payment", post(create_single_payment))
        .route("/create-subscription", post(create_subscription))
        .route("/check-subscription", get(check_subscription))
        .route("/webhook", post(handle_webhook))
}
