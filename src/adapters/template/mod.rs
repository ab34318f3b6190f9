//! Template rendering adapters.

mod markdown_renderer;

pub use markdown_renderer::MarkdownRenderer;
