//! ListDocumentsHandler - paged listing of a user's own documents.

use std::sync::Arc;

use crate::domain::document::DocumentError;
use crate::domain::foundation::UserId;
use crate::ports::{DocumentPage, DocumentStore};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

/// Query for a user's documents, newest first.
#[derive(Debug, Clone)]
pub struct ListDocumentsQuery {
    pub user_id: UserId,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Handler for document listings.
///
/// Listing is owner-only; it never exposes another user's documents,
/// so no purchase check applies here.
pub struct ListDocumentsHandler {
    store: Arc<dyn DocumentStore>,
}

impl ListDocumentsHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListDocumentsQuery) -> Result<DocumentPage, DocumentError> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        self.store
            .list_for_user(&query.user_id, page, per_page)
            .await
            .map_err(|e| DocumentError::infrastructure(e.message))
    }
}
