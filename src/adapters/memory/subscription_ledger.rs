//! In-memory subscription ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp, UserId};
use crate::ports::{SubscriptionLedger, SubscriptionUpdate};

/// Mutex-backed subscription ledger keyed by the processor's
/// subscription id.
#[derive(Default)]
pub struct InMemorySubscriptionLedger {
    subscriptions: Mutex<HashMap<String, Subscription>>,
}

impl InMemorySubscriptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubscriptionLedger for InMemorySubscriptionLedger {
    async fn upsert_from_processor_state(
        &self,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, DomainError> {
        let mut subscriptions = self.subscriptions.lock().map_err(poisoned)?;

        let subscription = subscriptions
            .entry(update.processor_subscription_id.clone())
            .and_modify(|existing| {
                existing.status = update.status;
                existing.current_period_start = update.current_period_start;
                existing.current_period_end = update.current_period_end;
                existing.cancel_at_period_end = update.cancel_at_period_end;
                if update.user_id.is_some() {
                    existing.user_id = update.user_id.clone();
                }
                if update.plan_name.is_some() {
                    existing.plan_name = update.plan_name.clone();
                }
                if update.price_id.is_some() {
                    existing.price_id = update.price_id.clone();
                }
                if update.amount_cents.is_some() {
                    existing.amount_cents = update.amount_cents;
                }
            })
            .or_insert_with(|| Subscription {
                id: SubscriptionId::new(),
                user_id: update.user_id.clone(),
                processor_subscription_id: update.processor_subscription_id.clone(),
                price_id: update.price_id.clone(),
                status: update.status,
                current_period_start: update.current_period_start,
                current_period_end: update.current_period_end,
                cancel_at_period_end: update.cancel_at_period_end,
                plan_name: update.plan_name.clone(),
                amount_cents: update.amount_cents,
                currency: update.currency.clone(),
            })
            .clone();

        Ok(subscription)
    }

    async fn cancel(&self, processor_subscription_id: &str) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.lock().map_err(poisoned)?;
        if let Some(subscription) = subscriptions.get_mut(processor_subscription_id) {
            subscription.status = SubscriptionStatus::Cancelled;
        }
        Ok(())
    }

    async fn get_active_for_user(
        &self,
        user_id: &UserId,
        now: &Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let subscriptions = self.subscriptions.lock().map_err(poisoned)?;
        Ok(subscriptions
            .values()
            .find(|s| {
                s.user_id.as_ref().map(|u| u.as_str()) == Some(user_id.as_str())
                    && s.is_entitling_at(now)
            })
            .cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, "subscription ledger lock poisoned")
}
