//! Document renderer port.

use crate::domain::document::{DocumentError, FormAnswer, Template};

/// Renders a template plus validated answers into document content.
///
/// Rendering is pure and synchronous; it never touches storage.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, template: &Template, answers: &[FormAnswer]) -> Result<String, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_renderer_is_object_safe() {
        fn _accepts_dyn(_renderer: &dyn DocumentRenderer) {}
    }
}
