//! Document HTTP adapter: templates, generation, gated retrieval and download.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::DocumentsAppState;
pub use routes::documents_routes;
