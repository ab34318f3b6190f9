//! PostgreSQL implementation of the document store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::document::{Document, DocumentStatus, FormAnswer};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{DocumentPage, DocumentStore};

/// sqlx-backed document store.
///
/// The download counter is incremented with a single UPDATE so
/// concurrent downloads serialize at the row and never lose updates.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    name: String,
    doc_type: String,
    content: String,
    status: String,
    owner_id: Option<String>,
    guest_email: Option<String>,
    answers: serde_json::Value,
    signatures: serde_json::Value,
    download_count: i64,
    is_public: bool,
    template_id: String,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = DomainError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let status = DocumentStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid document status: {}", row.status),
            )
        })?;
        let answers: Vec<FormAnswer> = serde_json::from_value(row.answers).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid answers payload: {}", e),
            )
        })?;
        let signatures: BTreeMap<String, String> =
            serde_json::from_value(row.signatures).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid signatures payload: {}", e),
                )
            })?;
        let owner = row
            .owner_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid owner: {}", e)))?;

        Ok(Document {
            id: DocumentId::from_uuid(row.id),
            name: row.name,
            doc_type: row.doc_type,
            content: row.content,
            status,
            owner,
            guest_email: row.guest_email,
            answers,
            signatures,
            download_count: row.download_count.max(0) as u64,
            is_public: row.is_public,
            template_id: row.template_id,
            created_at: Timestamp::from_datetime(row.created_at),
            last_modified: Timestamp::from_datetime(row.last_modified),
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, doc_type, content, status, owner_id, guest_email, \
     answers, signatures, download_count, is_public, template_id, created_at, last_modified";

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), DomainError> {
        let answers = serde_json::to_value(&document.answers)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
        let signatures = serde_json::to_value(&document.signatures)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, name, doc_type, content, status, owner_id, guest_email,
                answers, signatures, download_count, is_public, template_id,
                created_at, last_modified
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(&document.name)
        .bind(&document.doc_type)
        .bind(&document.content)
        .bind(document.status.as_str())
        .bind(document.owner.as_ref().map(|o| o.as_str()))
        .bind(&document.guest_email)
        .bind(answers)
        .bind(signatures)
        .bind(document.download_count as i64)
        .bind(document.is_public)
        .bind(&document.template_id)
        .bind(document.created_at.as_datetime())
        .bind(document.last_modified.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert document: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find document: {}", e),
            )
        })?;

        row.map(Document::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: u32,
        per_page: u32,
    ) -> Result<DocumentPage, DomainError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE owner_id = $1")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to count documents: {}", e),
                )
            })?;

        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM documents WHERE owner_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list documents: {}", e),
            )
        })?;

        let documents = rows
            .into_iter()
            .map(Document::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DocumentPage {
            documents,
            total: total.max(0) as u64,
            page,
            per_page,
        })
    }

    async fn record_download(&self, id: &DocumentId) -> Result<u64, DomainError> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE documents
            SET download_count = download_count + 1, last_modified = NOW()
            WHERE id = $1
            RETURNING download_count
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record download: {}", e),
            )
        })?;

        let count = count
            .ok_or_else(|| DomainError::new(ErrorCode::DocumentNotFound, "Document not found"))?;

        Ok(count.max(0) as u64)
    }
}
