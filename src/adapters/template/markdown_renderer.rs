//! Markdown document renderer.

use std::collections::HashMap;
use std::fmt::Write;

use crate::domain::document::{DocumentError, FormAnswer, SignatureMode, Template};
use crate::ports::DocumentRenderer;

/// Renders a filled-in template into a markdown document.
///
/// Answers are assumed validated; a question without an answer renders
/// as "Not provided" rather than failing.
#[derive(Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn render(&self, template: &Template, answers: &[FormAnswer]) -> Result<String, DocumentError> {
        let by_question: HashMap<&str, String> = answers
            .iter()
            .map(|a| (a.question_id.as_str(), a.value.render()))
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", template.name);
        let _ = writeln!(
            out,
            "**Generated on:** {}\n",
            chrono::Utc::now().format("%Y-%m-%d")
        );

        let _ = writeln!(out, "## Document Details\n");
        for question in &template.questions {
            let value = by_question
                .get(question.id.as_str())
                .cloned()
                .unwrap_or_else(|| "Not provided".to_string());
            let _ = writeln!(out, "**{}:** {}", question.text, value);
        }

        let _ = writeln!(out, "\n## Terms and Conditions\n");
        let _ = writeln!(
            out,
            "This {} is created based on the provided information and serves as a \
             legally binding agreement between the parties involved.\n",
            template.name
        );

        let _ = writeln!(out, "### 1. General Provisions");
        let _ = writeln!(
            out,
            "The parties agree to the terms outlined in this document and acknowledge \
             their understanding of all clauses contained herein.\n"
        );

        let _ = writeln!(out, "### 2. Specific Terms");
        for question in &template.questions {
            let value = by_question
                .get(question.id.as_str())
                .cloned()
                .unwrap_or_else(|| "Not provided".to_string());
            let _ = writeln!(out, "- {}: {}", question.text, value);
        }

        let _ = writeln!(out, "\n### 3. Signatures");
        let signatures = match template.signature_mode {
            SignatureMode::None => "No signatures required for this document.",
            SignatureMode::Single | SignatureMode::Dual => {
                "This document requires signatures from all parties."
            }
        };
        let _ = writeln!(out, "{}\n", signatures);

        let _ = writeln!(out, "---\n");
        let _ = write!(out, "*This document was generated using DocuGen.*");

        Ok(out)
    }
}
