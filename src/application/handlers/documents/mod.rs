//! Document handlers: generation, retrieval, listing, download.

mod download_document;
mod generate_document;
mod get_document;
mod list_documents;

pub use download_document::{DownloadDocumentCommand, DownloadDocumentHandler, DownloadResult};
pub use generate_document::{GenerateDocumentCommand, GenerateDocumentHandler};
pub use get_document::{GetDocumentHandler, GetDocumentQuery};
pub use list_documents::{ListDocumentsHandler, ListDocumentsQuery};
