//! Payment handlers: purchase initiation, subscription checkout, status
//! checks, and webhook processing.

mod check_subscription;
mod create_single_payment;
mod create_subscription_checkout;
mod handle_payment_webhook;

pub use check_subscription::{
    CheckSubscriptionHandler, CheckSubscriptionQuery, SubscriptionStatusResult,
};
pub use create_single_payment::{
    CreateSinglePaymentCommand, CreateSinglePaymentHandler, CreateSinglePaymentResult,
};
pub use create_subscription_checkout::{
    CreateSubscriptionCheckoutCommand, CreateSubscriptionCheckoutHandler,
};
pub use handle_payment_webhook::{HandlePaymentWebhookHandler, WebhookDisposition};
