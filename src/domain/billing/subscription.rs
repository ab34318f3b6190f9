//! Subscription ledger row mirroring the payment processor's state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};

/// Subscription status as reported by the processor.
///
/// The ledger mirrors the processor's lifecycle rather than defining its
/// own: the processor is the source of truth and updates are
/// last-write-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    PastDue,
    Unpaid,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Unpaid => "unpaid",
        }
    }

    /// Parses a processor status string.
    ///
    /// Accepts both the US spelling the processor sends ("canceled")
    /// and the stored form ("cancelled").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SubscriptionStatus::Active),
            "cancelled" | "canceled" => Some(SubscriptionStatus::Cancelled),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "unpaid" => Some(SubscriptionStatus::Unpaid),
            _ => None,
        }
    }
}

/// One recurring-billing subscription per processor subscription id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: Option<UserId>,
    /// Processor subscription id (sub_...); unique per ledger row.
    pub processor_subscription_id: String,
    pub price_id: Option<String>,
    pub status: SubscriptionStatus,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub plan_name: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: String,
}

impl Subscription {
    /// Returns true if this subscription entitles its user at `now`.
    ///
    /// The status string alone is not enough: an `active` row whose
    /// period has lapsed (processor event not yet delivered) must not
    /// entitle. The period-end check is the authoritative freshness
    /// guard.
    pub fn is_entitling_at(&self, now: &Timestamp) -> bool {
        self.status == SubscriptionStatus::Active
            && self
                .current_period_end
                .map(|end| end.is_after(now))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(status: SubscriptionStatus, period_end: Option<Timestamp>) -> Subscription {
        Subscription {
            id: SubscriptionId::new(),
            user_id: Some(UserId::new("u1").unwrap()),
            processor_subscription_id: "sub_1".to_string(),
            price_id: Some("price_pro".to_string()),
            status,
            current_period_start: Some(Timestamp::now().add_days(-1)),
            current_period_end: period_end,
            cancel_at_period_end: false,
            plan_name: Some("pro".to_string()),
            amount_cents: Some(1999),
            currency: "usd".to_string(),
        }
    }

    #[test]
    fn active_with_future_period_end_entitles() {
        let sub = subscription(SubscriptionStatus::Active, Some(Timestamp::now().add_days(30)));
        assert!(sub.is_entitling_at(&Timestamp::now()));
    }

    #[test]
    fn active_with_lapsed_period_does_not_entitle() {
        let sub = subscription(SubscriptionStatus::Active, Some(Timestamp::now().add_days(-1)));
        assert!(!sub.is_entitling_at(&Timestamp::now()));
    }

    #[test]
    fn active_without_period_end_does_not_entitle() {
        let sub = subscription(SubscriptionStatus::Active, None);
        assert!(!sub.is_entitling_at(&Timestamp::now()));
    }

    #[test]
    fn cancelled_does_not_entitle_even_with_future_period() {
        let sub = subscription(
            SubscriptionStatus::Cancelled,
            Some(Timestamp::now().add_days(30)),
        );
        assert!(!sub.is_entitling_at(&Timestamp::now()));
    }

    #[test]
    fn parse_accepts_both_cancelled_spellings() {
        assert_eq!(
            SubscriptionStatus::parse("canceled"),
            Some(SubscriptionStatus::Cancelled)
        );
        assert_eq!(
            SubscriptionStatus::parse("cancelled"),
            Some(SubscriptionStatus::Cancelled)
        );
        assert_eq!(SubscriptionStatus::parse("trialing"), None);
    }

    #[test]
    fn status_string_mapping_roundtrips() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Unpaid,
        ] {
            assert_eq!(SubscriptionStatus::parse(status.as_str()), Some(status));
        }
    }
}
