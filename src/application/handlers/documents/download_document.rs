//! DownloadDocumentHandler - gated download with an atomic counter bump.

use std::sync::Arc;

use crate::domain::billing::{evaluate_access, AccessDecision};
use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{DocumentId, UserId};
use crate::ports::{DocumentStore, PurchaseLedger};

/// Command to download a document.
#[derive(Debug, Clone)]
pub struct DownloadDocumentCommand {
    pub document_id: DocumentId,
    pub user_id: Option<UserId>,
    pub guest_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub document: Document,
    pub decision: AccessDecision,
    /// Counter value after this download.
    pub download_count: u64,
}

/// Handler for gated downloads.
///
/// The purchase ledger is only consulted when the requester is not the
/// owner; owners never pay for their own documents. On a grant the
/// download counter is bumped atomically at the store so concurrent
/// downloads never lose updates.
pub struct DownloadDocumentHandler {
    store: Arc<dyn DocumentStore>,
    purchases: Arc<dyn PurchaseLedger>,
}

impl DownloadDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>, purchases: Arc<dyn PurchaseLedger>) -> Self {
        Self { store, purchases }
    }

    pub async fn handle(&self, cmd: DownloadDocumentCommand) -> Result<DownloadResult, DocumentError> {
        let mut document = self
            .store
            .find_by_id(&cmd.document_id)
            .await
            .map_err(|e| DocumentError::infrastructure(e.message))?
            .ok_or_else(|| DocumentError::not_found(cmd.document_id))?;

        let decision = self
            .evaluate(&document, cmd.user_id.as_ref(), cmd.guest_email.as_deref())
            .await?;

        if !decision.is_granted() {
            return Err(DocumentError::AccessDenied);
        }

        let download_count = self
            .store
            .record_download(&cmd.document_id)
            .await
            .map_err(|e| DocumentError::infrastructure(e.message))?;
        document.download_count = download_count;

        Ok(DownloadResult {
            document,
            decision,
            download_count,
        })
    }

    async fn evaluate(
        &self,
        document: &Document,
        user_id: Option<&UserId>,
        guest_email: Option<&str>,
    ) -> Result<AccessDecision, DocumentError> {
        if let Some(user_id) = user_id {
            if document.is_owned_by(user_id) {
                return Ok(AccessDecision::Owner);
            }
        }

        let purchase = self
            .purchases
            .find_completed_entitlement(&document.id, user_id, guest_email)
            .await
            .map_err(|e| DocumentError::infrastructure(e.message))?;

        Ok(evaluate_access(
            document,
            user_id,
            guest_email,
            purchase.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDocumentStore, InMemoryPurchaseLedger};
    use crate::domain::billing::Purchase;
    use crate::domain::foundation::Timestamp;

    async fn seeded(
        owner: Option<&str>,
    ) -> (
        DownloadDocumentHandler,
        Document,
        Arc<InMemoryPurchaseLedger>,
    ) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let purchases = Arc::new(InMemoryPurchaseLedger::new());

        let document = Document::generate(
            "NDA",
            "Non-Disclosure Agreement",
            "# NDA\n...",
            "nda",
            Vec::new(),
            owner.map(|o| UserId::new(o).unwrap()),
            None,
            Timestamp::now(),
        );
        store.insert(&document).await.unwrap();

        let handler = DownloadDocumentHandler::new(store, purchases.clone());
        (handler, document, purchases)
    }

    async fn seed_purchase(purchases: &InMemoryPurchaseLedger, document_id: DocumentId, complete: bool) {
        let purchase = Purchase::new_pending(
            document_id,
            None,
            Some("a@b.com".to_string()),
            "pi_1",
            499,
            "usd",
            Timestamp::now(),
        );
        purchases.create_pending(&purchase).await.unwrap();
        if complete {
            purchases.mark_completed("pi_1").await.unwrap();
        }
    }

    #[tokio::test]
    async fn owner_download_increments_counter() {
        let (handler, document, _purchases) = seeded(Some("u1")).await;

        let cmd = DownloadDocumentCommand {
            document_id: document.id,
            user_id: Some(UserId::new("u1").unwrap()),
            guest_email: None,
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(first.decision, AccessDecision::Owner);
        assert_eq!(first.download_count, 1);
        assert_eq!(first.document.download_count, 1);

        let second = handler.handle(cmd).await.unwrap();
        assert_eq!(second.download_count, 2);
    }

    #[tokio::test]
    async fn stranger_is_denied() {
        let (handler, document, _purchases) = seeded(Some("u1")).await;

        let result = handler
            .handle(DownloadDocumentCommand {
                document_id: document.id,
                user_id: Some(UserId::new("u2").unwrap()),
                guest_email: None,
            })
            .await;

        assert!(matches!(result, Err(DocumentError::AccessDenied)));
    }

    #[tokio::test]
    async fn guest_with_completed_purchase_downloads() {
        let (handler, document, purchases) = seeded(None).await;
        seed_purchase(&purchases, document.id, true).await;

        let result = handler
            .handle(DownloadDocumentCommand {
                document_id: document.id,
                user_id: None,
                guest_email: Some("A@B.com".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(result.decision, AccessDecision::Purchased);
        assert_eq!(result.download_count, 1);
    }

    #[tokio::test]
    async fn pending_purchase_does_not_grant() {
        let (handler, document, purchases) = seeded(None).await;
        seed_purchase(&purchases, document.id, false).await;

        let result = handler
            .handle(DownloadDocumentCommand {
                document_id: document.id,
                user_id: None,
                guest_email: Some("a@b.com".to_string()),
            })
            .await;

        assert!(matches!(result, Err(DocumentError::AccessDenied)));
    }

    #[tokio::test]
    async fn denied_download_does_not_touch_counter() {
        let (handler, document, _purchases) = seeded(Some("u1")).await;

        let result = handler
            .handle(DownloadDocumentCommand {
                document_id: document.id,
                user_id: Some(UserId::new("u2").unwrap()),
                guest_email: None,
            })
            .await;
        assert!(matches!(result, Err(DocumentError::AccessDenied)));

        let after = handler
            .handle(DownloadDocumentCommand {
                document_id: document.id,
                user_id: Some(UserId::new("u1").unwrap()),
                guest_email: None,
            })
            .await
            .unwrap();
        assert_eq!(after.download_count, 1);
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let (handler, _document, _purchases) = seeded(None).await;

        let result = handler
            .handle(DownloadDocumentCommand {
                document_id: DocumentId::new(),
                user_id: None,
                guest_email: None,
            })
            .await;

        assert!(matches!(result, Err(DocumentError::NotFound { .. })));
    }

    #[tokio::test]
    async fn concurrent_downloads_all_count() {
        let (handler, document, _purchases) = seeded(Some("u1")).await;
        let handler = Arc::new(handler);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handler = handler.clone();
            let cmd = DownloadDocumentCommand {
                document_id: document.id,
                user_id: Some(UserId::new("u1").unwrap()),
                guest_email: None,
            };
            tasks.push(tokio::spawn(async move { handler.handle(cmd).await }));
        }

        let mut counts = Vec::new();
        for task in tasks {
            counts.push(task.await.unwrap().unwrap().download_count);
        }
        counts.sort_unstable();
        assert_eq!(counts, (1..=8).collect::<Vec<u64>>());
    }
}
