//! In-memory document store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, UserId};
use crate::ports::{DocumentPage, DocumentStore};

/// Mutex-backed document store. The counter increment happens under the
/// lock, matching the atomicity the Postgres adapter gets from a single
/// UPDATE statement.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<DocumentId, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.lock().map_err(poisoned)?;
        documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let documents = self.documents.lock().map_err(poisoned)?;
        Ok(documents.get(id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: u32,
        per_page: u32,
    ) -> Result<DocumentPage, DomainError> {
        let documents = self.documents.lock().map_err(poisoned)?;

        let mut owned: Vec<Document> = documents
            .values()
            .filter(|d| d.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.as_datetime().cmp(&a.created_at.as_datetime()));

        let total = owned.len() as u64;
        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let documents = owned
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Ok(DocumentPage {
            documents,
            total,
            page,
            per_page,
        })
    }

    async fn record_download(&self, id: &DocumentId) -> Result<u64, DomainError> {
        let mut documents = self.documents.lock().map_err(poisoned)?;
        let document = documents
            .get_mut(id)
            .ok_or_else(|| DomainError::new(ErrorCode::DocumentNotFound, "Document not found"))?;
        document.download_count += 1;
        Ok(document.download_count)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, "document store lock poisoned")
}
