//! Ports: contracts between the application layer and infrastructure.

mod document_renderer;
mod document_store;
mod payment_provider;
mod purchase_ledger;
mod session_validator;
mod subscription_ledger;
mod user_profiles;

pub use document_renderer::DocumentRenderer;
pub use document_store::{DocumentPage, DocumentStore};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutSessionRequest, CreatePaymentIntentRequest, PaymentError,
    PaymentErrorCode, PaymentIntent, PaymentProvider,
};
pub use purchase_ledger::{CompletionOutcome, PurchaseLedger};
pub use session_validator::SessionValidator;
pub use subscription_ledger::{SubscriptionLedger, SubscriptionUpdate};
pub use user_profiles::UserProfiles;
