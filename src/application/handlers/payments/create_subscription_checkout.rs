//! CreateSubscriptionCheckoutHandler - starts a hosted subscription checkout.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{CheckoutSession, CreateCheckoutSessionRequest, PaymentProvider};

/// Command to start a subscription checkout.
///
/// The plan's processor price id is resolved from configuration before
/// the command is built; an unknown plan never reaches this handler.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCheckoutCommand {
    pub user_id: UserId,
    pub plan_name: String,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Handler for subscription checkout initiation.
///
/// No ledger row is written here. The subscription appears in the
/// ledger when the processor's `customer.subscription.created` event
/// arrives on the webhook.
pub struct CreateSubscriptionCheckoutHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreateSubscriptionCheckoutHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCheckoutCommand,
    ) -> Result<CheckoutSession, DomainError> {
        self.provider
            .create_checkout_session(CreateCheckoutSessionRequest {
                user_id: cmd.user_id,
                price_id: cmd.price_id,
                plan_name: cmd.plan_name,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
            })
            .await
            .map_err(DomainError::from)
    }
}
