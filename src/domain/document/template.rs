//! Built-in document templates and their question schemas.
//!
//! Each template declares the ordered questions a client must answer
//! before a document can be generated. Answers are validated against
//! this schema (see `answers`).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::document::SignatureMode;

/// The expected value type for a template question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Number,
    Date,
    Select,
}

/// A single question in a template's schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateQuestion {
    /// Stable question identifier, referenced by answers.
    pub id: String,
    /// Prompt shown to the user.
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub required: bool,
    /// Allowed values for `Select` questions; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl TemplateQuestion {
    fn text_q(id: &str, text: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            question_type: QuestionType::Text,
            required,
            options: Vec::new(),
        }
    }

    fn number_q(id: &str, text: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            question_type: QuestionType::Number,
            required,
            options: Vec::new(),
        }
    }

    fn date_q(id: &str, text: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            question_type: QuestionType::Date,
            required,
            options: Vec::new(),
        }
    }

    fn select_q(id: &str, text: &str, required: bool, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            question_type: QuestionType::Select,
            required,
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A document template: identity, presentation metadata, and question schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub signature_mode: SignatureMode,
    pub questions: Vec<TemplateQuestion>,
}

static TEMPLATES: Lazy<Vec<Template>> = Lazy::new(|| {
    vec![
        Template {
            id: "employment-agreement".to_string(),
            name: "Employment Agreement".to_string(),
            description: "Comprehensive employment contract template".to_string(),
            category: "Employment".to_string(),
            signature_mode: SignatureMode::Dual,
            questions: vec![
                TemplateQuestion::text_q("employeeName", "Employee Full Name", true),
                TemplateQuestion::text_q("position", "Job Position", true),
                TemplateQuestion::number_q("salary", "Annual Salary", true),
                TemplateQuestion::date_q("startDate", "Start Date", true),
            ],
        },
        Template {
            id: "nda".to_string(),
            name: "Non-Disclosure Agreement".to_string(),
            description: "Protect confidential information".to_string(),
            category: "Legal".to_string(),
            signature_mode: SignatureMode::Dual,
            questions: vec![
                TemplateQuestion::text_q("disclosingParty", "Disclosing Party Name", true),
                TemplateQuestion::text_q("receivingParty", "Receiving Party Name", true),
                TemplateQuestion::text_q("purposeDescription", "Purpose Description", true),
            ],
        },
        Template {
            id: "service-agreement".to_string(),
            name: "Service Agreement".to_string(),
            description: "Contract for professional services".to_string(),
            category: "Business".to_string(),
            signature_mode: SignatureMode::Dual,
            questions: vec![
                TemplateQuestion::text_q("providerName", "Service Provider Name", true),
                TemplateQuestion::text_q("clientName", "Client Name", true),
                TemplateQuestion::text_q("serviceDescription", "Service Description", true),
                TemplateQuestion::number_q("fee", "Total Fee", true),
                TemplateQuestion::select_q(
                    "paymentSchedule",
                    "Payment Schedule",
                    true,
                    &["upfront", "monthly", "on_completion"],
                ),
                TemplateQuestion::date_q("effectiveDate", "Effective Date", false),
            ],
        },
    ]
});

/// Returns the built-in template catalog.
pub fn builtin_templates() -> &'static [Template] {
    &TEMPLATES
}

/// Looks up a template by id.
pub fn find_template(template_id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == template_id)
}
