//! In-memory purchase ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::billing::{Purchase, PurchaseStatus};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, UserId};
use crate::ports::{CompletionOutcome, PurchaseLedger};

/// Mutex-backed purchase ledger keyed by payment intent id, mirroring
/// the unique constraint the Postgres adapter enforces.
#[derive(Default)]
pub struct InMemoryPurchaseLedger {
    purchases: Mutex<HashMap<String, Purchase>>,
}

impl InMemoryPurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.lock().map(|p| p.is_empty()).unwrap_or(true)
    }

    /// Direct lookup for test assertions.
    pub async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<Purchase>, DomainError> {
        let purchases = self.purchases.lock().map_err(poisoned)?;
        Ok(purchases.get(payment_intent_id).cloned())
    }
}

#[async_trait]
impl PurchaseLedger for InMemoryPurchaseLedger {
    async fn create_pending(&self, purchase: &Purchase) -> Result<(), DomainError> {
        let mut purchases = self.purchases.lock().map_err(poisoned)?;
        if purchases.contains_key(&purchase.payment_intent_id) {
            return Err(DomainError::conflict(format!(
                "Purchase for payment intent {} already exists",
                purchase.payment_intent_id
            )));
        }
        purchases.insert(purchase.payment_intent_id.clone(), purchase.clone());
        Ok(())
    }

    async fn mark_completed(
        &self,
        payment_intent_id: &str,
    ) -> Result<CompletionOutcome, DomainError> {
        let mut purchases = self.purchases.lock().map_err(poisoned)?;
        match purchases.get_mut(payment_intent_id) {
            Some(purchase) if purchase.status == PurchaseStatus::Pending => {
                purchase.mark_completed();
                Ok(CompletionOutcome::Completed)
            }
            Some(_) => Ok(CompletionOutcome::AlreadyCompleted),
            None => Ok(CompletionOutcome::UnknownIntent),
        }
    }

    async fn find_completed_entitlement(
        &self,
        document_id: &DocumentId,
        user_id: Option<&UserId>,
        guest_email: Option<&str>,
    ) -> Result<Option<Purchase>, DomainError> {
        let purchases = self.purchases.lock().map_err(poisoned)?;
        Ok(purchases
            .values()
            .find(|p| p.document_id == *document_id && p.entitles(user_id, guest_email))
            .cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, "purchase ledger lock poisoned")
}
