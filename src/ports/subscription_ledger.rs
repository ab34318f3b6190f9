//! Subscription ledger port.
//!
//! Mirrors processor subscription state keyed by the processor's
//! subscription id. Writes are last-write-wins upserts; the processor
//! is the source of truth.

use async_trait::async_trait;

use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// State extracted from a processor subscription event.
#[derive(Debug, Clone)]
pub struct SubscriptionUpdate {
    pub processor_subscription_id: String,
    pub user_id: Option<UserId>,
    pub status: SubscriptionStatus,
    pub price_id: Option<String>,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub plan_name: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: String,
}

/// Ledger of recurring-billing subscriptions.
#[async_trait]
pub trait SubscriptionLedger: Send + Sync {
    /// Creates or updates the row for this processor subscription id.
    ///
    /// Idempotent: replaying the same event converges on the same row.
    /// Fields absent from `update` are not cleared when `None` carries
    /// no information (user id and plan name are only overwritten when
    /// present).
    async fn upsert_from_processor_state(
        &self,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, DomainError>;

    /// Marks the subscription cancelled, leaving period fields as they
    /// were.
    ///
    /// Cancelling an unknown subscription id is a no-op.
    async fn cancel(&self, processor_subscription_id: &str) -> Result<(), DomainError>;

    /// Returns the user's entitling subscription, if any.
    ///
    /// A subscription entitles only while `active` with a period end
    /// strictly in the future of `now`.
    async fn get_active_for_user(
        &self,
        user_id: &UserId,
        now: &Timestamp,
    ) -> Result<Option<Subscription>, DomainError>;
}
