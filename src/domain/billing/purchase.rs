//! Purchase ledger row: one record per payment attempt for a document.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, PurchaseId, Timestamp, UserId};

/// Status of a single-document purchase.
///
/// Transitions observed in the billing flow are one-directional:
/// `pending -> completed` on processor confirmation. `Failed` and
/// `Refunded` are modeled but not yet written by any webhook path
/// (reserved states).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
            PurchaseStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PurchaseStatus::Pending),
            "completed" => Some(PurchaseStatus::Completed),
            "failed" => Some(PurchaseStatus::Failed),
            "refunded" => Some(PurchaseStatus::Refunded),
            _ => None,
        }
    }

    /// Returns true if a transition from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use PurchaseStatus::*;
        matches!(
            (self, target),
            (Pending, Completed) | (Pending, Failed) | (Completed, Refunded)
        )
    }
}

/// One payment attempt for one document, keyed by the processor's
/// payment-intent id (globally unique).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub document_id: DocumentId,
    pub user_id: Option<UserId>,
    pub guest_email: Option<String>,
    pub payment_intent_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PurchaseStatus,
    pub created_at: Timestamp,
    /// Optional expiry for time-limited document access.
    pub expires_at: Option<Timestamp>,
}

impl Purchase {
    /// Creates a new pending purchase for a payment intent that has
    /// already been accepted by the processor.
    pub fn new_pending(
        document_id: DocumentId,
        user_id: Option<UserId>,
        guest_email: Option<String>,
        payment_intent_id: impl Into<String>,
        amount_cents: i64,
        currency: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: PurchaseId::new(),
            document_id,
            user_id,
            guest_email: guest_email.map(|e| e.to_lowercase()),
            payment_intent_id: payment_intent_id.into(),
            amount_cents,
            currency: currency.into(),
            status: PurchaseStatus::Pending,
            created_at: now,
            expires_at: None,
        }
    }

    /// Marks the purchase completed.
    ///
    /// Idempotent: completing an already-completed purchase is a no-op,
    /// since the processor redelivers confirmation events.
    pub fn mark_completed(&mut self) {
        if self.status == PurchaseStatus::Pending {
            self.status = PurchaseStatus::Completed;
        }
    }

    /// Returns true if this purchase entitles the given requester to the
    /// purchased document.
    pub fn entitles(&self, user_id: Option<&UserId>, guest_email: Option<&str>) -> bool {
        if self.status != PurchaseStatus::Completed {
            return false;
        }
        let user_match = match (self.user_id.as_ref(), user_id) {
            (Some(mine), Some(theirs)) => mine.as_str() == theirs.as_str(),
            _ => false,
        };
        let guest_match = match (self.guest_email.as_deref(), guest_email) {
            (Some(mine), Some(theirs)) => mine.eq_ignore_ascii_case(theirs),
            _ => false,
        };
        user_match || guest_match
    }
}
