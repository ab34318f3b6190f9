//! User profile port.
//!
//! The profile carries a denormalized copy of the user's subscription
//! status for cheap display reads. Entitlement checks never read it;
//! they go through the subscription ledger.

use async_trait::async_trait;

use crate::domain::billing::SubscriptionStatus;
use crate::domain::foundation::{DomainError, UserId};

/// Write-through cache of per-user subscription status.
#[async_trait]
pub trait UserProfiles: Send + Sync {
    /// Records the user's latest subscription status and plan.
    ///
    /// Unknown users get a profile row created. Last write wins.
    async fn set_subscription_status(
        &self,
        user_id: &UserId,
        status: SubscriptionStatus,
        plan_name: Option<&str>,
    ) -> Result<(), DomainError>;

    /// Returns the stored status, or `None` for users never touched by
    /// a subscription event.
    async fn get_subscription_status(
        &self,
        user_id: &UserId,
    ) -> Result<Option<(SubscriptionStatus, Option<String>)>, DomainError>;
}
