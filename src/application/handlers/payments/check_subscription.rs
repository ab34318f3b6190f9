//! CheckSubscriptionHandler - reports whether a user currently subscribes.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::SubscriptionLedger;

/// Query for the user's current subscription state.
#[derive(Debug, Clone)]
pub struct CheckSubscriptionQuery {
    pub user_id: UserId,
}

/// Current subscription state for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionStatusResult {
    pub subscribed: bool,
    pub tier: Option<String>,
    pub period_end: Option<Timestamp>,
}

impl SubscriptionStatusResult {
    fn none() -> Self {
        Self {
            subscribed: false,
            tier: None,
            period_end: None,
        }
    }
}

/// Handler for subscription status checks.
///
/// Reads the ledger, not the denormalized profile copy: an `active` row
/// whose period already lapsed reports as not subscribed.
pub struct CheckSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionLedger>,
}

impl CheckSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionLedger>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        query: CheckSubscriptionQuery,
    ) -> Result<SubscriptionStatusResult, DomainError> {
        let now = Timestamp::now();
        let subscription = self
            .subscriptions
            .get_active_for_user(&query.user_id, &now)
            .await?;

        Ok(match subscription {
            Some(sub) => SubscriptionStatusResult {
                subscribed: true,
                tier: sub.plan_name.clone(),
                period_end: sub.current_period_end,
            },
            None => SubscriptionStatusResult::none(),
        })
    }
}
