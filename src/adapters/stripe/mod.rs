//! Stripe payment processor adapter.

mod stripe_adapter;

pub use stripe_adapter::{StripeAdapter, StripeAdapterConfig};
