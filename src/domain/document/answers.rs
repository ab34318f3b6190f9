//! Typed form answers and validation against a template's question schema.
//!
//! Answers are an ordered sequence of (question id, value) pairs rather
//! than an open-ended map, so each template keeps its own shape while
//! values stay typed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::DocumentError;
use super::template::{QuestionType, Template};

/// A typed answer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Select(String),
}

impl AnswerValue {
    /// Returns true if this value matches the expected question type.
    pub fn matches(&self, question_type: QuestionType) -> bool {
        matches!(
            (self, question_type),
            (AnswerValue::Text(_), QuestionType::Text)
                | (AnswerValue::Number(_), QuestionType::Number)
                | (AnswerValue::Date(_), QuestionType::Date)
                | (AnswerValue::Select(_), QuestionType::Select)
        )
    }

    /// Renders the value for inclusion in document content.
    pub fn render(&self) -> String {
        match self {
            AnswerValue::Text(s) | AnswerValue::Select(s) => s.clone(),
            AnswerValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            AnswerValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One answered question, in template order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAnswer {
    pub question_id: String,
    #[serde(flatten)]
    pub value: AnswerValue,
}

impl FormAnswer {
    pub fn new(question_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

/// Validates answers against the template's question schema.
///
/// Checks, in order:
/// - every answer references a question the template declares
/// - no question is answered twice
/// - every required question has an answer
/// - each value matches the question's declared type
/// - `Select` values are among the question's options
pub fn validate_answers(template: &Template, answers: &[FormAnswer]) -> Result<(), DocumentError> {
    for answer in answers {
        let question = template
            .questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .ok_or_else(|| DocumentError::unknown_question(&answer.question_id))?;

        if answers
            .iter()
            .filter(|a| a.question_id == answer.question_id)
            .count()
            > 1
        {
            return Err(DocumentError::answer_invalid(
                &answer.question_id,
                "answered more than once",
            ));
        }

        if !answer.value.matches(question.question_type) {
            return Err(DocumentError::answer_invalid(
                &answer.question_id,
                "value does not match the question type",
            ));
        }

        if let AnswerValue::Select(choice) = &answer.value {
            if !question.options.iter().any(|o| o == choice) {
                return Err(DocumentError::answer_invalid(
                    &answer.question_id,
                    format!("'{}' is not an allowed option", choice),
                ));
            }
        }
    }

    for question in template.questions.iter().filter(|q| q.required) {
        if !answers.iter().any(|a| a.question_id == question.id) {
            return Err(DocumentError::missing_answer(&question.id));
        }
    }

    Ok(())
}
