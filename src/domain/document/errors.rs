//! Error types for document operations.

use thiserror::Error;

use crate::domain::foundation::DocumentId;

/// Errors from document generation, lookup, and download.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// Referenced template does not exist in the catalog.
    #[error("Template not found: {template_id}")]
    TemplateNotFound { template_id: String },

    /// Referenced document does not exist.
    #[error("Document not found: {document_id}")]
    NotFound { document_id: DocumentId },

    /// An answer references a question the template does not declare.
    #[error("Unknown question: {question_id}")]
    UnknownQuestion { question_id: String },

    /// A required question has no answer.
    #[error("Missing answer for required question: {question_id}")]
    MissingAnswer { question_id: String },

    /// An answer value is malformed for its question.
    #[error("Invalid answer for '{question_id}': {reason}")]
    AnswerInvalid { question_id: String, reason: String },

    /// The requester is neither the owner nor holds a completed purchase.
    #[error("Access denied: purchase required")]
    AccessDenied,

    /// Storage or other infrastructure failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl DocumentError {
    pub fn template_not_found(template_id: impl Into<String>) -> Self {
        DocumentError::TemplateNotFound {
            template_id: template_id.into(),
        }
    }

    pub fn not_found(document_id: DocumentId) -> Self {
        DocumentError::NotFound { document_id }
    }

    pub fn unknown_question(question_id: impl Into<String>) -> Self {
        DocumentError::UnknownQuestion {
            question_id: question_id.into(),
        }
    }

    pub fn missing_answer(question_id: impl Into<String>) -> Self {
        DocumentError::MissingAnswer {
            question_id: question_id.into(),
        }
    }

    pub fn answer_invalid(question_id: impl Into<String>, reason: impl Into<String>) -> Self {
        DocumentError::AnswerInvalid {
            question_id: question_id.into(),
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DocumentError::Infrastructure(message.into())
    }
}
