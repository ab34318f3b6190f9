//! Billing domain: purchase and subscription ledger types, the access
//! evaluator, and payment-processor webhook parsing and verification.

mod access;
mod purchase;
mod stripe_event;
mod subscription;
mod webhook_errors;
mod webhook_verifier;

pub use access::{evaluate_access, AccessDecision};
pub use purchase::{Purchase, PurchaseStatus};
pub use stripe_event::{
    PaymentIntentMetadata, PaymentIntentObject, StripeEvent, StripeEventData, StripeEventType,
    SubscriptionMetadata, SubscriptionObject, SubscriptionPlan,
};
pub use subscription::{Subscription, SubscriptionStatus};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, WebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
