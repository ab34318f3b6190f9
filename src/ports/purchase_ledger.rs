//! Purchase ledger port.
//!
//! Records single-document payment attempts and their completion. The
//! ledger itself carries the idempotency guarantees: the payment-intent
//! id is a unique key, and completion is a no-op when already applied.

use async_trait::async_trait;

use crate::domain::billing::Purchase;
use crate::domain::foundation::{DocumentId, DomainError, UserId};

/// Result of applying a processor confirmation to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A pending purchase was flipped to completed.
    Completed,
    /// The purchase was already completed; redelivered event.
    AlreadyCompleted,
    /// No ledger row references this payment intent.
    UnknownIntent,
}

/// Ledger of single-document purchases.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Records a pending purchase for an accepted payment intent.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a purchase for this payment intent already exists
    async fn create_pending(&self, purchase: &Purchase) -> Result<(), DomainError>;

    /// Marks the purchase for this payment intent completed.
    ///
    /// Idempotent: redelivered confirmations return `AlreadyCompleted`
    /// and confirmations for unknown intents return `UnknownIntent`
    /// rather than failing.
    async fn mark_completed(
        &self,
        payment_intent_id: &str,
    ) -> Result<CompletionOutcome, DomainError>;

    /// Finds a completed purchase that entitles the requester to the
    /// document.
    ///
    /// Matches on the document plus either the user id or the guest
    /// email (case-insensitive). Returns `None` if no completed purchase
    /// matches.
    async fn find_completed_entitlement(
        &self,
        document_id: &DocumentId,
        user_id: Option<&UserId>,
        guest_email: Option<&str>,
    ) -> Result<Option<Purchase>, DomainError>;
}
