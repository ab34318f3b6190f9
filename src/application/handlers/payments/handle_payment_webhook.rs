//! HandlePaymentWebhookHandler - verifies and applies processor events.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::billing::{
    PaymentIntentObject, StripeEvent, StripeEventType, SubscriptionObject, SubscriptionStatus,
    WebhookError, WebhookVerifier,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{
    CompletionOutcome, PurchaseLedger, SubscriptionLedger, SubscriptionUpdate, UserProfiles,
};

/// What a processed webhook event did to the ledgers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// A pending purchase was completed.
    PurchaseCompleted { payment_intent_id: String },
    /// Redelivered confirmation; the purchase was already completed.
    PurchaseAlreadyCompleted { payment_intent_id: String },
    /// Confirmation for an intent with no ledger row; acknowledged.
    UnknownPurchaseIntent { payment_intent_id: String },
    /// Subscription state was mirrored into the ledger.
    SubscriptionUpserted { processor_subscription_id: String },
    /// Subscription was marked cancelled.
    SubscriptionCancelled { processor_subscription_id: String },
    /// Event acknowledged without any ledger write.
    Ignored,
}

/// Handler for the processor's webhook endpoint.
///
/// Verification precedes everything else; unverified payloads never
/// reach a ledger. All event applications are idempotent, so processor
/// redelivery converges instead of double-writing.
pub struct HandlePaymentWebhookHandler {
    verifier: WebhookVerifier,
    purchases: Arc<dyn PurchaseLedger>,
    subscriptions: Arc<dyn SubscriptionLedger>,
    profiles: Arc<dyn UserProfiles>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        purchases: Arc<dyn PurchaseLedger>,
        subscriptions: Arc<dyn SubscriptionLedger>,
        profiles: Arc<dyn UserProfiles>,
    ) -> Self {
        Self {
            verifier,
            purchases,
            subscriptions,
            profiles,
        }
    }

    pub async fn handle(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookDisposition, WebhookError> {
        let event = self.verifier.verify_and_parse(payload, signature_header)?;

        match event.parsed_type() {
            StripeEventType::PaymentIntentSucceeded => self.apply_payment_succeeded(&event).await,
            StripeEventType::CustomerSubscriptionCreated
            | StripeEventType::CustomerSubscriptionUpdated => {
                self.apply_subscription_update(&event).await
            }
            StripeEventType::CustomerSubscriptionDeleted => {
                self.apply_subscription_deleted(&event).await
            }
            StripeEventType::Unknown => {
                info!(event_id = %event.id, event_type = %event.event_type, "ignoring unhandled event type");
                Ok(WebhookDisposition::Ignored)
            }
        }
    }

    async fn apply_payment_succeeded(
        &self,
        event: &StripeEvent,
    ) -> Result<WebhookDisposition, WebhookError> {
        let intent: PaymentIntentObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::Parse(e.to_string()))?;

        if !intent.is_single_document() {
            info!(event_id = %event.id, intent_id = %intent.id, "payment intent is not a document purchase, ignoring");
            return Ok(WebhookDisposition::Ignored);
        }

        let outcome = self
            .purchases
            .mark_completed(&intent.id)
            .await
            .map_err(|e| WebhookError::Ledger(e.message))?;

        Ok(match outcome {
            CompletionOutcome::Completed => {
                info!(event_id = %event.id, intent_id = %intent.id, "purchase completed");
                WebhookDisposition::PurchaseCompleted {
                    payment_intent_id: intent.id,
                }
            }
            CompletionOutcome::AlreadyCompleted => {
                info!(event_id = %event.id, intent_id = %intent.id, "purchase already completed, redelivery");
                WebhookDisposition::PurchaseAlreadyCompleted {
                    payment_intent_id: intent.id,
                }
            }
            CompletionOutcome::UnknownIntent => {
                warn!(event_id = %event.id, intent_id = %intent.id, "no purchase recorded for payment intent");
                WebhookDisposition::UnknownPurchaseIntent {
                    payment_intent_id: intent.id,
                }
            }
        })
    }

    async fn apply_subscription_update(
        &self,
        event: &StripeEvent,
    ) -> Result<WebhookDisposition, WebhookError> {
        let object: SubscriptionObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::Parse(e.to_string()))?;

        let status = match SubscriptionStatus::parse(&object.status) {
            Some(status) => status,
            None => {
                info!(event_id = %event.id, subscription_id = %object.id, status = %object.status, "unsupported subscription status, ignoring");
                return Ok(WebhookDisposition::Ignored);
            }
        };

        let user_id = object
            .metadata
            .user_id
            .as_deref()
            .and_then(|id| UserId::new(id).ok());
        let plan_name = object.metadata.plan_name.clone();
        let (price_id, amount_cents, currency) = match &object.plan {
            Some(plan) => (
                plan.id.clone(),
                plan.amount,
                plan.currency.clone().unwrap_or_else(|| "usd".to_string()),
            ),
            None => (None, None, "usd".to_string()),
        };

        let subscription = self
            .subscriptions
            .upsert_from_processor_state(SubscriptionUpdate {
                processor_subscription_id: object.id.clone(),
                user_id: user_id.clone(),
                status,
                price_id,
                current_period_start: object.current_period_start.map(Timestamp::from_unix_secs),
                current_period_end: object.current_period_end.map(Timestamp::from_unix_secs),
                cancel_at_period_end: object.cancel_at_period_end,
                plan_name: plan_name.clone(),
                amount_cents,
                currency,
            })
            .await
            .map_err(|e| WebhookError::Ledger(e.message))?;

        // Write-through to the profile's display copy. The ledger row is
        // the authoritative record either way.
        if let Some(user_id) = subscription.user_id.as_ref() {
            self.profiles
                .set_subscription_status(user_id, status, subscription.plan_name.as_deref())
                .await
                .map_err(|e| WebhookError::Ledger(e.message))?;
        }

        info!(event_id = %event.id, subscription_id = %object.id, status = %object.status, "subscription state mirrored");
        Ok(WebhookDisposition::SubscriptionUpserted {
            processor_subscription_id: object.id,
        })
    }

    async fn apply_subscription_deleted(
        &self,
        event: &StripeEvent,
    ) -> Result<WebhookDisposition, WebhookError> {
        let object: SubscriptionObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::Parse(e.to_string()))?;

        self.subscriptions
            .cancel(&object.id)
            .await
            .map_err(|e| WebhookError::Ledger(e.message))?;

        info!(event_id = %event.id, subscription_id = %object.id, "subscription cancelled");
        Ok(WebhookDisposition::SubscriptionCancelled {
            processor_subscription_id: object.id,
        })
    }
}
