//! Document aggregate: generated content plus access-control metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, Timestamp, UserId};

use super::answers::FormAnswer;

/// Lifecycle status of a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Completed,
    Signed,
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Signed => "signed",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(DocumentStatus::Draft),
            "completed" => Some(DocumentStatus::Completed),
            "signed" => Some(DocumentStatus::Signed),
            "cancelled" => Some(DocumentStatus::Cancelled),
            _ => None,
        }
    }
}

/// How many parties must sign the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureMode {
    None,
    Single,
    Dual,
}

/// A generated document.
///
/// Either `owner` or `guest_email` identifies the creator for access
/// control; both may be absent for public template previews. The download
/// counter only ever increases, and the increment itself happens at the
/// storage layer so concurrent downloads cannot lose updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub doc_type: String,
    pub content: String,
    pub status: DocumentStatus,
    pub owner: Option<UserId>,
    pub guest_email: Option<String>,
    pub answers: Vec<FormAnswer>,
    /// Signature images keyed by party role, as data-URL strings.
    pub signatures: BTreeMap<String, String>,
    pub download_count: u64,
    pub is_public: bool,
    pub template_id: String,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

impl Document {
    /// Creates a freshly generated document.
    ///
    /// Generation completes in one step, so documents start in
    /// `Completed` rather than `Draft`.
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        name: impl Into<String>,
        doc_type: impl Into<String>,
        content: impl Into<String>,
        template_id: impl Into<String>,
        answers: Vec<FormAnswer>,
        owner: Option<UserId>,
        guest_email: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            doc_type: doc_type.into(),
            content: content.into(),
            status: DocumentStatus::Completed,
            owner,
            guest_email: guest_email.map(|e| e.to_lowercase()),
            answers,
            signatures: BTreeMap::new(),
            download_count: 0,
            is_public: false,
            template_id: template_id.into(),
            created_at: now,
            last_modified: now,
        }
    }

    /// String-normalized ownership check.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner
            .as_ref()
            .map(|owner| owner.as_str() == user_id.as_str())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document(owner: Option<UserId>) -> Document {
        Document::generate(
            "Employment Agreement",
            "Employment Agreement",
            "# Employment Agreement\n...",
            "employment-agreement",
            Vec::new(),
            owner,
            None,
            Timestamp::now(),
        )
    }

    #[test]
    fn generated_document_starts_completed_with_zero_downloads() {
        let doc = sample_document(None);
        assert_eq!(doc.status, DocumentStatus::Completed);
        assert_eq!(doc.download_count, 0);
        assert!(!doc.is_public);
    }

    #[test]
    fn ownership_check_matches_owner() {
        let owner = UserId::new("user-1").unwrap();
        let doc = sample_document(Some(owner.clone()));
        assert!(doc.is_owned_by(&owner));
        assert!(!doc.is_owned_by(&UserId::new("user-2").unwrap()));
    }

    #[test]
    fn ownerless_document_is_owned_by_nobody() {
        let doc = sample_document(None);
        assert!(!doc.is_owned_by(&UserId::new("user-1").unwrap()));
    }

    #[test]
    fn guest_email_is_normalized_to_lowercase() {
        let doc = Document::generate(
            "NDA",
            "Non-Disclosure Agreement",
            "...",
            "nda",
            Vec::new(),
            None,
            Some("Guest@Example.COM".to_string()),
            Timestamp::now(),
        );
        assert_eq!(doc.guest_email.as_deref(), Some("guest@example.com"));
    }

    #[test]
    fn status_string_mapping_roundtrips() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::Completed,
            DocumentStatus::Signed,
            DocumentStatus::Cancelled,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("archived"), None);
    }
}
