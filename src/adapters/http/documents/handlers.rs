//! HTTP handlers for document endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::documents::{
    DownloadDocumentCommand, DownloadDocumentHandler, GenerateDocumentCommand,
    GenerateDocumentHandler, GetDocumentHandler, GetDocumentQuery, ListDocumentsHandler,
    ListDocumentsQuery,
};
use crate::domain::document::{builtin_templates, DocumentError};
use crate::domain::foundation::DocumentId;
use crate::ports::{DocumentRenderer, DocumentStore, PurchaseLedger};

use super::super::auth::{AuthenticatedUser, OptionalUser};
use super::super::error::ErrorResponse;
use super::dto::{
    DocumentListResponse, DocumentResponse, DownloadRequest, DownloadResponse,
    GenerateDocumentRequest, ListParams, TemplateListResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for document endpoints.
///
/// Cloned per request; all dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct DocumentsAppState {
    pub document_store: Arc<dyn DocumentStore>,
    pub purchase_ledger: Arc<dyn PurchaseLedger>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl DocumentsAppState {
    /// Create handlers on demand from the shared state.
    pub fn generate_handler(&self) -> GenerateDocumentHandler {
        GenerateDocumentHandler::new(self.document_store.clone(), self.renderer.clone())
    }

    pub fn get_handler(&self) -> GetDocumentHandler {
        GetDocumentHandler::new(self.document_store.clone())
    }

    pub fn list_handler(&self) -> ListDocumentsHandler {
        ListDocumentsHandler::new(self.document_store.clone())
    }

    pub fn download_handler(&self) -> DownloadDocumentHandler {
        DownloadDocumentHandler::new(self.document_store.clone(), self.purchase_ledger.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/documents/templates - List available templates
pub async fn list_templates() -> impl IntoResponse {
    Json(TemplateListResponse {
        templates: builtin_templates().to_vec(),
    })
}

/// POST /api/documents/generate-document - Generate a document from a template
pub async fn generate_document(
    State(state): State<DocumentsAppState>,
    user: OptionalUser,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<impl IntoResponse, DocumentApiError> {
    let handler = state.generate_handler();
    let cmd = GenerateDocumentCommand {
        template_id: request.template_id,
        answers: request.answers,
        user_id: user.user_id,
        guest_email: request.guest_email,
    };

    let document = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

/// GET /api/documents - List the current user's documents
pub async fn list_documents(
    State(state): State<DocumentsAppState>,
    user: AuthenticatedUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, DocumentApiError> {
    let handler = state.list_handler();
    let query = ListDocumentsQuery {
        user_id: user.user_id,
        page: params.page,
        per_page: params.per_page,
    };

    let page = handler.handle(query).await?;

    Ok(Json(DocumentListResponse::from(page)))
}

/// GET /api/documents/:id - Fetch one document
///
/// Retrieval is ungated; only the download route consults the payment
/// gate.
pub async fn get_document(
    State(state): State<DocumentsAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DocumentApiError> {
    let document_id = parse_document_id(&id)?;

    let handler = state.get_handler();
    let document = handler.handle(GetDocumentQuery { document_id }).await?;

    Ok(Json(DocumentResponse::from(document)))
}

/// POST /api/documents/:id/download - Download a document, gated on access
///
/// Guests identify themselves with an `email` field in the JSON body;
/// authenticated owners may post an empty body.
pub async fn download_document(
    State(state): State<DocumentsAppState>,
    user: OptionalUser,
    Path(id): Path<String>,
    body: Option<Json<DownloadRequest>>,
) -> Result<impl IntoResponse, DocumentApiError> {
    let document_id = parse_document_id(&id)?;
    let guest_email = body.and_then(|Json(request)| request.email);

    let handler = state.download_handler();
    let cmd = DownloadDocumentCommand {
        document_id,
        user_id: user.user_id,
        guest_email,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(DownloadResponse {
        document: DocumentResponse::from(result.document),
        download_count: result.download_count,
    }))
}

fn parse_document_id(raw: &str) -> Result<DocumentId, DocumentApiError> {
    raw.parse::<DocumentId>()
        .map_err(|_| DocumentApiError::invalid_id(raw))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts document errors to HTTP responses.
pub struct DocumentApiError(DocumentError);

impl DocumentApiError {
    fn invalid_id(raw: &str) -> Self {
        DocumentApiError(DocumentError::AnswerInvalid {
            question_id: "id".to_string(),
            reason: format!("'{}' is not a valid document id", raw),
        })
    }
}

impl From<DocumentError> for DocumentApiError {
    fn from(err: DocumentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DocumentApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            DocumentError::TemplateNotFound { .. } => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
            DocumentError::NotFound { .. } => (StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND"),
            DocumentError::AccessDenied => (StatusCode::PAYMENT_REQUIRED, "PURCHASE_REQUIRED"),
            DocumentError::UnknownQuestion { .. }
            | DocumentError::MissingAnswer { .. }
            | DocumentError::AnswerInvalid { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            DocumentError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse::new(error_code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}
