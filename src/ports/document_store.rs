//! Document store port.
//!
//! Persistence contract for generated documents, including the atomic
//! download counter.

use async_trait::async_trait;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, UserId};

/// One page of a user's document listing.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl DocumentPage {
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.total + self.per_page as u64 - 1) / self.per_page as u64) as u32
    }
}

/// Store for generated documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a newly generated document.
    async fn insert(&self, document: &Document) -> Result<(), DomainError>;

    /// Returns the document, or `None` if it does not exist.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Lists a user's documents, newest first.
    ///
    /// `page` is 1-based.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: u32,
        per_page: u32,
    ) -> Result<DocumentPage, DomainError>;

    /// Atomically increments the document's download counter.
    ///
    /// The increment happens in storage so concurrent downloads each
    /// observe a distinct count. Returns the counter after increment.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document does not exist
    async fn record_download(&self, id: &DocumentId) -> Result<u64, DomainError>;
}
