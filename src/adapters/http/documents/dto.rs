//! HTTP DTOs for document endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::document::{Document, FormAnswer, Template};
use crate::ports::DocumentPage;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to generate a document from a template.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDocumentRequest {
    /// The template to generate from.
    pub template_id: String,
    /// Answers to the template's questions.
    pub answers: Vec<FormAnswer>,
    /// Guest creator email, for unauthenticated generation.
    #[serde(default)]
    pub guest_email: Option<String>,
}

/// Query parameters for document listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Request body for a download, identifying a guest requester.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadRequest {
    /// Guest email used to match a completed purchase.
    #[serde(default)]
    pub email: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response listing the available templates.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
}

/// A document as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub name: String,
    pub doc_type: String,
    pub content: String,
    pub status: String,
    pub template_id: String,
    pub download_count: u64,
    /// When the document was created (ISO 8601).
    pub created_at: String,
    /// When the document was last modified (ISO 8601).
    pub last_modified: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id.to_string(),
            name: document.name,
            doc_type: document.doc_type,
            content: document.content,
            status: document.status.as_str().to_string(),
            template_id: document.template_id,
            download_count: document.download_count,
            created_at: document.created_at.as_datetime().to_rfc3339(),
            last_modified: document.last_modified.as_datetime().to_rfc3339(),
        }
    }
}

/// A page of the user's documents.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentResponse>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl From<DocumentPage> for DocumentListResponse {
    fn from(page: DocumentPage) -> Self {
        let total_pages = page.total_pages();
        Self {
            documents: page
                .documents
                .into_iter()
                .map(DocumentResponse::from)
                .collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

/// Response for a completed download.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    pub document: DocumentResponse,
    /// Counter value after this download.
    pub download_count: u64,
}
