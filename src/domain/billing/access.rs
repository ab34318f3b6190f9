//! Access evaluator: pure decision over ownership and the purchase ledger.
//!
//! Active subscriptions are intentionally not an entitlement path here:
//! the download flow only honors ownership and direct per-document
//! purchases. DESIGN.md records this as a known product gap rather than
//! silently widening the grant.

use crate::domain::document::Document;
use crate::domain::foundation::UserId;

use super::purchase::Purchase;

/// Outcome of an access evaluation, with the reason for a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Requester owns the document.
    Owner,
    /// Requester holds a completed purchase for the document.
    Purchased,
    /// No entitlement; caller should route to a payment flow.
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        !matches!(self, AccessDecision::Denied)
    }
}

/// Decides whether a requester may view/download a document.
///
/// Read-only: the caller increments the download counter after a grant.
/// `completed_purchase` is the ledger row the caller looked up for
/// (document, user-or-guest, status completed), if any; it is re-checked
/// here so a stale or mismatched row can never grant.
pub fn evaluate_access(
    document: &Document,
    user_id: Option<&UserId>,
    guest_email: Option<&str>,
    completed_purchase: Option<&Purchase>,
) -> AccessDecision {
    if let Some(user_id) = user_id {
        if document.is_owned_by(user_id) {
            return AccessDecision::Owner;
        }
    }

    if let Some(purchase) = completed_purchase {
        if purchase.document_id == document.id && purchase.entitles(user_id, guest_email) {
            return AccessDecision::Purchased;
        }
    }

    AccessDecision::Denied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::PurchaseStatus;
    use crate::domain::foundation::{DocumentId, Timestamp};
    use proptest::prelude::*;

    fn document(owner: Option<&str>, guest_email: Option<&str>) -> Document {
        Document::generate(
            "NDA",
            "Non-Disclosure Agreement",
            "...",
            "nda",
            Vec::new(),
            owner.map(|o| UserId::new(o).unwrap()),
            guest_email.map(|e| e.to_string()),
            Timestamp::now(),
        )
    }

    fn completed_purchase(
        document_id: DocumentId,
        user: Option<&str>,
        guest: Option<&str>,
    ) -> Purchase {
        let mut purchase = Purchase::new_pending(
            document_id,
            user.map(|u| UserId::new(u).unwrap()),
            guest.map(|g| g.to_string()),
            "pi_1",
            499,
            "usd",
            Timestamp::now(),
        );
        purchase.mark_completed();
        purchase
    }

    #[test]
    fn owner_is_granted_without_any_purchase() {
        let doc = document(Some("u1"), None);
        let user = UserId::new("u1").unwrap();
        let decision = evaluate_access(&doc, Some(&user), None, None);
        assert_eq!(decision, AccessDecision::Owner);
    }

    #[test]
    fn non_owner_without_purchase_is_denied() {
        let doc = document(Some("u1"), None);
        let user = UserId::new("u2").unwrap();
        let decision = evaluate_access(&doc, Some(&user), None, None);
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn guest_with_completed_purchase_is_granted() {
        let doc = document(None, Some("a@b.com"));
        let purchase = completed_purchase(doc.id, None, Some("a@b.com"));
        let decision = evaluate_access(&doc, None, Some("a@b.com"), Some(&purchase));
        assert_eq!(decision, AccessDecision::Purchased);
    }

    #[test]
    fn purchase_for_a_different_document_does_not_grant() {
        let doc = document(None, Some("a@b.com"));
        let purchase = completed_purchase(DocumentId::new(), None, Some("a@b.com"));
        let decision = evaluate_access(&doc, None, Some("a@b.com"), Some(&purchase));
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn pending_purchase_does_not_grant() {
        let doc = document(None, Some("a@b.com"));
        let mut purchase = completed_purchase(doc.id, None, Some("a@b.com"));
        purchase.status = PurchaseStatus::Pending;
        let decision = evaluate_access(&doc, None, Some("a@b.com"), Some(&purchase));
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn anonymous_requester_with_nothing_is_denied() {
        let doc = document(Some("u1"), None);
        assert_eq!(
            evaluate_access(&doc, None, None, None),
            AccessDecision::Denied
        );
    }

    proptest! {
        /// Owners are granted regardless of what the purchase ledger holds.
        #[test]
        fn owner_always_granted(owner in "[a-z0-9]{1,12}", other in "[a-z0-9]{1,12}") {
            let doc = document(Some(&owner), None);
            let user = UserId::new(owner.clone()).unwrap();

            let unrelated = completed_purchase(DocumentId::new(), Some(&other), None);
            let decision = evaluate_access(&doc, Some(&user), None, Some(&unrelated));
            prop_assert!(decision.is_granted());
        }

        /// A requester who neither owns nor purchased is always denied.
        #[test]
        fn stranger_always_denied(owner in "[a-z0-9]{1,12}", stranger in "[A-Z0-9]{1,12}") {
            let doc = document(Some(&owner), None);
            let user = UserId::new(format!("x-{}", stranger)).unwrap();
            let decision = evaluate_access(&doc, Some(&user), None, None);
            prop_assert_eq!(decision, AccessDecision::Denied);
        }

        /// A single matching completed purchase always grants.
        #[test]
        fn matching_purchase_always_grants(guest in "[a-z]{1,10}@[a-z]{1,8}\\.com") {
            let doc = document(None, Some(&guest));
            let purchase = completed_purchase(doc.id, None, Some(&guest));
            let decision = evaluate_access(&doc, None, Some(&guest), Some(&purchase));
            prop_assert_eq!(decision, AccessDecision::Purchased);
        }
    }
}
