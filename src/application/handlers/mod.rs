//! Handlers for the document and payment operations.

pub mod documents;
pub mod payments;
