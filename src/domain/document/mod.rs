//! Document domain: generated documents, templates, and typed form answers.

mod answers;
mod document;
mod errors;
mod template;

pub use answers::{validate_answers, AnswerValue, FormAnswer};
pub use document::{Document, DocumentStatus, SignatureMode};
pub use errors::DocumentError;
pub use template::{builtin_templates, find_template, QuestionType, Template, TemplateQuestion};
