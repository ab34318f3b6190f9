//! Axum router configuration for document endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    download_document, generate_document, get_document, list_documents, list_templates,
    DocumentsAppState,
};

/// Create the document API router.
///
/// # Routes
///
/// ## Public Endpoints
/// - `GET /templates` - List available templates
/// - `POST /generate-document` - Generate a document (guests pass `guest_email`)
/// - `GET /:id` - Fetch a document
/// - `POST /:id/download` - Download a document, gated on ownership or purchase
///
/// ## User Endpoints (require authentication)
/// - `GET /` - List the current user's documents
pub fn documents_routes() -> Router<DocumentsAppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/templates", get(list_templates))
        .route("/generate-document", post(generate_document))
        .route("/:id", get(get_document))
        .route("/:id/download", post(download_document))
}
