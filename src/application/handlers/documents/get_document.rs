//! GetDocumentHandler - document retrieval by id.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentStore;

/// Query for one document.
#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub document_id: DocumentId,
}

/// Handler for document retrieval.
///
/// Retrieval is not payment-gated; only the download path consults the
/// purchase ledger. Clients fetch metadata and content freely and hit
/// the gate when they download.
pub struct GetDocumentHandler {
    store: Arc<dyn DocumentStore>,
}

impl GetDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<Document, DocumentError> {
        self.store
            .find_by_id(&query.document_id)
            .await
            .map_err(|e| DocumentError::infrastructure(e.message))?
            .ok_or_else(|| DocumentError::not_found(query.document_id))
    }
}
