//! GenerateDocumentHandler - validates answers and persists a rendered document.

use std::sync::Arc;

use crate::domain::document::{
    find_template, validate_answers, Document, DocumentError, FormAnswer,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{DocumentRenderer, DocumentStore};

/// Command to generate a document from a template.
#[derive(Debug, Clone)]
pub struct GenerateDocumentCommand {
    pub template_id: String,
    pub answers: Vec<FormAnswer>,
    /// Authenticated creator, if any.
    pub user_id: Option<UserId>,
    /// Guest creator email, if any.
    pub guest_email: Option<String>,
}

/// Handler for document generation.
///
/// Generation completes in one step: validate the answers against the
/// template schema, render the content, persist the document.
pub struct GenerateDocumentHandler {
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl GenerateDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { store, renderer }
    }

    pub async fn handle(&self, cmd: GenerateDocumentCommand) -> Result<Document, DocumentError> {
        let template = find_template(&cmd.template_id)
            .ok_or_else(|| DocumentError::template_not_found(&cmd.template_id))?;

        validate_answers(template, &cmd.answers)?;

        let content = self.renderer.render(template, &cmd.answers)?;

        let document = Document::generate(
            template.name.clone(),
            template.name.clone(),
            content,
            template.id.clone(),
            cmd.answers,
            cmd.user_id,
            cmd.guest_email,
            Timestamp::now(),
        );

        self.store
            .insert(&document)
            .await
            .map_err(|e| DocumentError::infrastructure(e.message))?;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDocumentStore;
    use crate::adapters::template::MarkdownRenderer;
    use crate::domain::document::AnswerValue;
    use crate::domain::foundation::DocumentId;

    fn handler_with_store() -> (GenerateDocumentHandler, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler =
            GenerateDocumentHandler::new(store.clone(), Arc::new(MarkdownRenderer::new()));
        (handler, store)
    }

    fn nda_command() -> GenerateDocumentCommand {
        GenerateDocumentCommand {
            template_id: "nda".to_string(),
            answers: vec![
                FormAnswer::new("disclosingParty", AnswerValue::Text("Acme Corp".into())),
                FormAnswer::new("receivingParty", AnswerValue::Text("Jordan Reyes".into())),
                FormAnswer::new(
                    "purposeDescription",
                    AnswerValue::Text("Partnership evaluation".into()),
                ),
            ],
            user_id: None,
            guest_email: Some("Guest@Example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn generates_and_persists_document() {
        let (handler, store) = handler_with_store();

        let document = handler.handle(nda_command()).await.unwrap();

        assert_eq!(document.template_id, "nda");
        assert!(document.content.contains("Acme Corp"));
        assert_eq!(document.guest_email.as_deref(), Some("guest@example.com"));

        let stored = store.find_by_id(&document.id).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn unknown_template_fails_without_persisting() {
        let (handler, store) = handler_with_store();

        let mut cmd = nda_command();
        cmd.template_id = "last-will".to_string();

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(DocumentError::TemplateNotFound { .. })));
        assert!(store
            .find_by_id(&DocumentId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn invalid_answers_fail_before_rendering() {
        let (handler, _store) = handler_with_store();

        let mut cmd = nda_command();
        cmd.answers.pop();

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(DocumentError::MissingAnswer { .. })));
    }
}
